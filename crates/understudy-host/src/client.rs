//! Resolution of the editor-side client attached to a fake connection.

/// Editor-side client associated with a fake server connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorClient {
    id: u32,
}

impl EditorClient {
    /// Creates a handle for the client with the given framework id.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self { id }
    }

    /// Framework-assigned client id, substituted into outgoing params.
    #[must_use]
    pub const fn id(self) -> u32 {
        self.id
    }
}

/// Looks up the live client for a connection and prepares it for first use.
///
/// The connection calls [`setup_client`](Self::setup_client) every time a
/// client resolves during a request; idempotence across repeated calls is
/// the resolver's responsibility, not the connection's.
pub trait ClientResolver {
    /// Returns the live client associated with this connection, if any.
    fn get_client(&self) -> Option<EditorClient>;

    /// One-time initialisation the client requires before first use.
    fn setup_client(&self, client: &EditorClient);
}

/// Resolver for connections with no editor client attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedClients;

impl ClientResolver for DetachedClients {
    fn get_client(&self) -> Option<EditorClient> {
        None
    }

    fn setup_client(&self, _client: &EditorClient) {}
}
