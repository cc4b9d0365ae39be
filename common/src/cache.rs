//! Cache em memória com TTL
//!
//! Memoriza consultas de rota/permissão por usuário. Cada entrada guarda o
//! instante da gravação; a leitura confere a idade antes de confiar no valor.
//! Gravações sobrescrevem. Sem travas: o cache pertence a quem o criou.

use crate::clock::{Clock, SystemClock};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::hash::Hash;

/// TTL das consultas de rota
pub const ROUTE_CACHE_TTL_SECS: i64 = 30;
/// TTL das consultas de permissão
pub const PERMISSION_CACHE_TTL_SECS: i64 = 5;

/// Entrada do cache
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub value: V,
    pub stored_at: DateTime<Utc>,
}

/// Cache com TTL fixo e relógio injetado
#[derive(Debug)]
pub struct TtlCache<K, V, C: Clock = SystemClock> {
    ttl: Duration,
    clock: C,
    entries: HashMap<K, CacheEntry<V>>,
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V, SystemClock> {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, SystemClock)
    }
}

impl<K: Eq + Hash, V: Clone, C: Clock> TtlCache<K, V, C> {
    pub fn with_clock(ttl: Duration, clock: C) -> Self {
        Self {
            ttl,
            clock,
            entries: HashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Valor ainda dentro do TTL
    pub fn get(&self, key: &K) -> Option<V> {
        let entry = self.entries.get(key)?;
        if self.is_fresh(entry) {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    /// Grava (ou sobrescreve) o valor
    pub fn insert(&mut self, key: K, value: V) {
        let stored_at = self.clock.now();
        self.entries.insert(key, CacheEntry { value, stored_at });
    }

    pub fn invalidate(&mut self, key: &K) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Remove entradas vencidas; devolve quantas saíram
    pub fn purge_expired(&mut self) -> usize {
        let now = self.clock.now();
        let ttl = self.ttl;
        let before = self.entries.len();
        self.entries.retain(|_, entry| now - entry.stored_at < ttl);
        before - self.entries.len()
    }

    /// Entradas armazenadas (inclui vencidas ainda não removidas)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn is_fresh(&self, entry: &CacheEntry<V>) -> bool {
        self.clock.now() - entry.stored_at < self.ttl
    }
}

/// Chave das consultas de rota: (usuário, rota)
pub type RouteKey = (String, String);

/// Cache de permissão de rota por usuário
pub type RoutePermissionCache<C = SystemClock> = TtlCache<RouteKey, bool, C>;

/// Cache de rotas com o TTL padrão (30 s)
pub fn route_cache<C: Clock>(clock: C) -> RoutePermissionCache<C> {
    TtlCache::with_clock(Duration::seconds(ROUTE_CACHE_TTL_SECS), clock)
}

/// Cache de permissões com o TTL curto (5 s)
pub fn permission_cache<C: Clock>(clock: C) -> RoutePermissionCache<C> {
    TtlCache::with_clock(Duration::seconds(PERMISSION_CACHE_TTL_SECS), clock)
}

pub fn route_key(user_id: &str, route: &str) -> RouteKey {
    (user_id.to_string(), route.to_string())
}
