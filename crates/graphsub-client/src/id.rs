use uuid::Uuid;

/// Strategy for minting operation ids.
///
/// Injected at connection construction so tests can pin deterministic ids.
/// Ids must not repeat among concurrently-live operations on one connection;
/// uniqueness is guaranteed here, not re-checked by the registry.
pub trait IdGenerator: Send + Sync {
    /// Produce a fresh operation id.
    fn next_id(&self) -> String;
}

/// Default strategy: random 128-bit tokens (UUIDv4), collision-free for
/// practical purposes.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomTokenIds;

impl IdGenerator for RandomTokenIds {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn random_tokens_are_unique() {
        let ids = RandomTokenIds;
        let minted: HashSet<String> = (0..256).map(|_| ids.next_id()).collect();
        assert_eq!(minted.len(), 256);
        assert!(minted.iter().all(|id| !id.is_empty()));
    }
}
