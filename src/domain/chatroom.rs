/// A chatroom as listed by the service. The name is both the display
/// label and the key used to query its messages.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Chatroom {
    pub name: String,
}

impl Chatroom {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl std::fmt::Display for Chatroom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
