//! Network topology and link properties.

use gathertree::Id;
use hashbrown::HashMap;

/// Properties of a link between two stations.
#[derive(Debug, Clone)]
pub struct Link {
    /// Packet loss rate (0.0 to 1.0), applied per direction per frame.
    pub loss_rate: f64,
    /// Whether the link is currently active.
    pub active: bool,
}

impl Default for Link {
    fn default() -> Self {
        Self {
            loss_rate: 0.0,
            active: true,
        }
    }
}

impl Link {
    /// Create a new link with default properties.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the loss rate.
    pub fn with_loss_rate(mut self, rate: f64) -> Self {
        self.loss_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Set whether the link is active.
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }
}

/// Topology defining which stations can hear each other.
///
/// Links are undirected; a transmission reaches every station with an
/// active link to the transmitter.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    links: HashMap<(Id, Id), Link>,
}

impl Topology {
    /// Create an empty topology (no station hears any other).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fully connected topology for the given stations.
    pub fn fully_connected(nodes: &[Id]) -> Self {
        let mut topo = Self::new();
        for (i, &a) in nodes.iter().enumerate() {
            for &b in nodes.iter().skip(i + 1) {
                topo.add_link(a, b, Link::default());
            }
        }
        topo
    }

    /// Create a chain topology (each station hears only its neighbors).
    pub fn chain(nodes: &[Id]) -> Self {
        let mut topo = Self::new();
        for window in nodes.windows(2) {
            topo.add_link(window[0], window[1], Link::default());
        }
        topo
    }

    /// Create a star topology (first station is the hub).
    pub fn star(nodes: &[Id]) -> Self {
        let mut topo = Self::new();
        if let Some((&hub, spokes)) = nodes.split_first() {
            for &spoke in spokes {
                topo.add_link(hub, spoke, Link::default());
            }
        }
        topo
    }

    fn key(a: Id, b: Id) -> (Id, Id) {
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }

    /// Add or replace a link between two stations.
    pub fn add_link(&mut self, a: Id, b: Id, link: Link) {
        self.links.insert(Self::key(a, b), link);
    }

    /// Get the link between two stations, if any.
    pub fn get_link(&self, a: Id, b: Id) -> Option<&Link> {
        self.links.get(&Self::key(a, b))
    }

    /// Get a mutable link between two stations, if any.
    pub fn get_link_mut(&mut self, a: Id, b: Id) -> Option<&mut Link> {
        self.links.get_mut(&Self::key(a, b))
    }

    /// Whether two stations currently hear each other.
    pub fn is_connected(&self, a: Id, b: Id) -> bool {
        self.get_link(a, b).is_some_and(|l| l.active)
    }

    /// All stations with an active link to `id`.
    pub fn neighbors(&self, id: Id) -> Vec<Id> {
        self.links
            .iter()
            .filter(|(_, link)| link.active)
            .filter_map(|(&(a, b), _)| {
                if a == id {
                    Some(b)
                } else if b == id {
                    Some(a)
                } else {
                    None
                }
            })
            .collect()
    }
}
