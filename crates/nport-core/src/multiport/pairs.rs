//! Port pairs and index bookkeeping

use std::fmt;

use crate::error::{NetworkError, Result};

/// Unordered pair of distinct ports, stored with `a < b`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PortPair {
    pub a: usize,
    pub b: usize,
}

impl PortPair {
    /// Normalize `(x, y)` to ascending order; `None` if `x == y`
    pub fn new(x: usize, y: usize) -> Option<Self> {
        match x.cmp(&y) {
            std::cmp::Ordering::Less => Some(Self { a: x, b: y }),
            std::cmp::Ordering::Greater => Some(Self { a: y, b: x }),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn contains(&self, port: usize) -> bool {
        self.a == port || self.b == port
    }

    /// Ports of an n-port outside this pair, ascending
    pub fn other_ports(&self, nports: usize) -> Vec<usize> {
        (0..nports).filter(|&p| !self.contains(p)).collect()
    }

    pub fn as_array(&self) -> [usize; 2] {
        [self.a, self.b]
    }
}

impl fmt::Display for PortPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.a, self.b)
    }
}

/// All C(n, 2) port pairs of an n-port in lexicographic order
pub fn port_pairs(nports: usize) -> Vec<PortPair> {
    (0..nports)
        .flat_map(|a| (a + 1..nports).map(move |b| PortPair { a, b }))
        .collect()
}

/// Tracks where original port indices sit while ports are removed one at a time
///
/// Removing a port shifts every higher port down by one, matching the port
/// order produced by [`Network::terminate`](crate::Network::terminate).
#[derive(Debug, Clone)]
pub struct PortMap {
    current: Vec<Option<usize>>,
}

impl PortMap {
    pub fn new(nports: usize) -> Self {
        Self {
            current: (0..nports).map(Some).collect(),
        }
    }

    /// Current index of an original port, if still present
    pub fn current(&self, original: usize) -> Option<usize> {
        self.current.get(original).copied().flatten()
    }

    /// Remove an original port, returning the index it had just before removal
    pub fn remove(&mut self, original: usize) -> Result<usize> {
        let idx = self
            .current(original)
            .ok_or(NetworkError::PortIndexOutOfRange {
                port: original,
                nports: self.len(),
            })?;
        self.current[original] = None;
        for slot in self.current.iter_mut().flatten() {
            if *slot > idx {
                *slot -= 1;
            }
        }
        Ok(idx)
    }

    /// Number of ports still present
    pub fn len(&self) -> usize {
        self.current.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_pair_normalizes() {
        assert_eq!(PortPair::new(3, 1), Some(PortPair { a: 1, b: 3 }));
        assert_eq!(PortPair::new(2, 2), None);
        let p = PortPair::new(0, 2).unwrap();
        assert!(p.contains(2));
        assert_eq!(p.other_ports(4), vec![1, 3]);
        assert_eq!(p.to_string(), "(0, 2)");
    }

    #[test]
    fn test_port_pairs_lexicographic() {
        let pairs: Vec<[usize; 2]> = port_pairs(4).iter().map(PortPair::as_array).collect();
        assert_eq!(
            pairs,
            vec![[0, 1], [0, 2], [0, 3], [1, 2], [1, 3], [2, 3]]
        );
        assert!(port_pairs(1).is_empty());
    }

    #[test]
    fn test_port_map_tracks_shifts() {
        let mut map = PortMap::new(5);
        assert_eq!(map.remove(1).unwrap(), 1);
        assert_eq!(map.current(4), Some(3));
        assert_eq!(map.remove(3).unwrap(), 2);
        assert_eq!(map.current(4), Some(2));
        assert_eq!(map.current(0), Some(0));
        assert_eq!(map.current(1), None);
        assert_eq!(map.len(), 3);
        assert!(map.remove(1).is_err());
    }
}
