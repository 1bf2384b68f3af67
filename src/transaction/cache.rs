//! Move function signature cache
//!
//! Normalized function signatures never change for a published package,
//! so entries live as long as the cache. Keyed by
//! `0x<64 hex>::module::function`.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::SuiResult;
use crate::rpc::{NormalizedMoveFunction, SuiRpc};
use crate::types::SuiAddress;
use crate::log_debug;

#[derive(Debug, Default)]
pub struct MoveFunctionCache {
    entries: RwLock<HashMap<String, Arc<NormalizedMoveFunction>>>,
}

impl MoveFunctionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalized cache key; short package addresses are padded
    pub fn key(package: &SuiAddress, module: &str, function: &str) -> String {
        format!("{}::{}::{}", package.to_hex(), module, function)
    }

    pub fn get(&self, package: &SuiAddress, module: &str, function: &str) -> Option<Arc<NormalizedMoveFunction>> {
        let key = Self::key(package, module, function);
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(&key).cloned()
    }

    pub fn insert(
        &self,
        package: &SuiAddress,
        module: &str,
        function: &str,
        signature: NormalizedMoveFunction,
    ) -> Arc<NormalizedMoveFunction> {
        let key = Self::key(package, module, function);
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        // A concurrent fetch may have landed first; keep that one
        entries.entry(key).or_insert_with(|| Arc::new(signature)).clone()
    }

    /// Cached signature, fetching through `rpc` on a miss
    pub fn get_or_fetch<R: SuiRpc + ?Sized>(
        &self,
        rpc: &R,
        package: &SuiAddress,
        module: &str,
        function: &str,
    ) -> SuiResult<Arc<NormalizedMoveFunction>> {
        if let Some(hit) = self.get(package, module, function) {
            return Ok(hit);
        }

        let fetched = rpc.get_normalized_move_function(&package.to_hex(), module, function)?;
        log_debug!(
            "cache",
            "Fetched Move function signature",
            package = package,
            module = module,
            function = function
        );
        Ok(self.insert(package, module, function, fetched))
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::MoveVisibility;

    fn signature() -> NormalizedMoveFunction {
        NormalizedMoveFunction {
            visibility: MoveVisibility::Public,
            is_entry: true,
            type_parameters: vec![],
            parameters: vec![],
            return_types: vec![],
        }
    }

    #[test]
    fn test_key_normalizes_short_address() {
        let key = MoveFunctionCache::key(&SuiAddress::from_u8(2), "coin", "split");
        assert_eq!(
            key,
            "0x0000000000000000000000000000000000000000000000000000000000000002::coin::split"
        );
    }

    #[test]
    fn test_insert_keeps_first_entry() {
        let cache = MoveFunctionCache::new();
        let pkg = SuiAddress::from_u8(2);
        let first = cache.insert(&pkg, "m", "f", signature());

        let mut other = signature();
        other.is_entry = false;
        let second = cache.insert(&pkg, "m", "f", other);

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_shared_across_threads() {
        let cache = Arc::new(MoveFunctionCache::new());
        let handles: Vec<_> = (0..4u8)
            .map(|i| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    cache.insert(&SuiAddress::from_u8(i), "m", "f", signature());
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len(), 4);
    }
}
