use std::collections::HashSet;

/// The machine a capture was taken on, known by all of its local addresses.
///
/// Two identities are equal when they hold the same set of addresses,
/// whatever order they were discovered in.
#[derive(Debug, Clone, Default)]
pub struct HostIdentity {
    addresses: Vec<String>,
    label: Option<String>,
}

impl HostIdentity {
    pub fn new(addresses: Vec<String>) -> Self {
        let mut identity = Self::default();
        for address in addresses {
            identity.insert(address);
        }
        identity
    }

    /// Fixes the node name regardless of which addresses were discovered.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn insert(&mut self, address: String) -> bool {
        if self.addresses.contains(&address) {
            return false;
        }
        self.addresses.push(address);
        true
    }

    pub fn addresses(&self) -> &[String] {
        &self.addresses
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    pub fn contains(&self, address: &str) -> bool {
        self.addresses.iter().any(|a| a == address)
    }

    /// Graph node name: the label if one is set, otherwise every address
    /// newline-joined in discovery order.
    pub fn node_name(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => self.addresses.join("\n"),
        }
    }
}

impl PartialEq for HostIdentity {
    fn eq(&self, other: &Self) -> bool {
        let ours: HashSet<&String> = self.addresses.iter().collect();
        let theirs: HashSet<&String> = other.addresses.iter().collect();
        ours == theirs
    }
}

impl Eq for HostIdentity {}
