use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;

use crate::domain::types::{DetectorTargets, Tone};

/// randomize 無効時にシードの代わりに混ぜる固定値
const STATIC_SEED: &str = "static";

/// 結果キャッシュのキー（blake3 の16進ダイジェスト）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

/// キー導出の入力
#[derive(Debug, Clone, Copy)]
pub struct CacheKeyInput<'a> {
    pub text: &'a str,
    pub profile_id: &'a str,
    /// トーン固定プロファイルでは None
    pub tone: Option<Tone>,
    pub provider: &'a str,
    pub model: &'a str,
    pub stealth: bool,
    pub detectors: DetectorTargets,
}

impl CacheKey {
    /// 各フィールドを長さ付きで連結してハッシュする（区切り文字の衝突を避けるため）
    pub fn derive(input: &CacheKeyInput<'_>) -> Self {
        let mut hasher = blake3::Hasher::new();
        let mut field = |bytes: &[u8]| {
            hasher.update(&(bytes.len() as u64).to_le_bytes());
            hasher.update(bytes);
        };
        field(input.text.as_bytes());
        field(input.profile_id.as_bytes());
        field(input.tone.map_or("", |t| t.label()).as_bytes());
        field(input.provider.as_bytes());
        field(input.model.as_bytes());
        field(&[input.stealth as u8]);
        let flags = input.detectors.flags().map(u8::from);
        field(&flags);
        field(STATIC_SEED.as_bytes());
        Self(hasher.finalize().to_hex().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// パイプライン結果のインメモリキャッシュ。容量超過時は最も長く参照されていないものから追い出す。
pub struct ResultCache {
    inner: Mutex<LruCache<CacheKey, String>>,
}

impl ResultCache {
    /// 容量 0 は 1 として扱う
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// ヒットしたエントリは最近使用扱いになる
    pub fn get(&self, key: &CacheKey) -> Option<String> {
        self.inner.lock().get(key).cloned()
    }

    /// 同一キーへの書き込みは上書き
    pub fn insert(&self, key: CacheKey, text: String) {
        self.inner.lock().put(key, text);
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().cap().get()
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input<'a>(text: &'a str) -> CacheKeyInput<'a> {
        CacheKeyInput {
            text,
            profile_id: "blog-post",
            tone: Some(Tone::Conversational),
            provider: "groq",
            model: "llama-3.3-70b-versatile",
            stealth: true,
            detectors: DetectorTargets::default(),
        }
    }

    #[test]
    fn test_key_is_deterministic() {
        let a = CacheKey::derive(&input("same text"));
        let b = CacheKey::derive(&input("same text"));
        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), 64);
    }

    #[test]
    fn test_key_changes_with_every_field() {
        let base = CacheKey::derive(&input("text"));
        let variants = [
            CacheKeyInput { text: "text2", ..input("text") },
            CacheKeyInput { profile_id: "email", ..input("text") },
            CacheKeyInput { tone: Some(Tone::Witty), ..input("text") },
            CacheKeyInput { tone: None, ..input("text") },
            CacheKeyInput { provider: "claude", ..input("text") },
            CacheKeyInput { model: "other", ..input("text") },
            CacheKeyInput { stealth: false, ..input("text") },
            CacheKeyInput {
                detectors: DetectorTargets { quillbot: false, ..DetectorTargets::default() },
                ..input("text")
            },
        ];
        for v in variants {
            assert_ne!(CacheKey::derive(&v), base, "{v:?}");
        }
    }

    #[test]
    fn test_field_boundaries_do_not_collide() {
        let a = CacheKey::derive(&CacheKeyInput { text: "ab", profile_id: "c", ..input("") });
        let b = CacheKey::derive(&CacheKeyInput { text: "a", profile_id: "bc", ..input("") });
        assert_ne!(a, b);
    }

    #[test]
    fn test_get_insert_clear() {
        let cache = ResultCache::new(4);
        let key = CacheKey::derive(&input("x"));
        assert!(cache.get(&key).is_none());
        cache.insert(key.clone(), "result".to_string());
        assert_eq!(cache.get(&key).as_deref(), Some("result"));
        cache.insert(key.clone(), "again".to_string());
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&key).as_deref(), Some("again"));
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_least_recently_used_evicted() {
        let cache = ResultCache::new(2);
        let keys: Vec<CacheKey> = ["a", "b", "c"].iter().map(|t| CacheKey::derive(&input(t))).collect();
        cache.insert(keys[0].clone(), "0".to_string());
        cache.insert(keys[1].clone(), "1".to_string());
        // a を参照したので次に追い出されるのは b
        assert_eq!(cache.get(&keys[0]).as_deref(), Some("0"));
        cache.insert(keys[2].clone(), "2".to_string());

        assert_eq!(cache.len(), 2);
        assert!(cache.get(&keys[1]).is_none());
        assert_eq!(cache.get(&keys[0]).as_deref(), Some("0"));
        assert_eq!(cache.get(&keys[2]).as_deref(), Some("2"));
    }

    #[test]
    fn test_overwrite_does_not_evict() {
        let cache = ResultCache::new(2);
        let a = CacheKey::derive(&input("a"));
        let b = CacheKey::derive(&input("b"));
        cache.insert(a.clone(), "1".to_string());
        cache.insert(b.clone(), "2".to_string());
        cache.insert(a.clone(), "3".to_string());
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&a).as_deref(), Some("3"));
        assert_eq!(cache.get(&b).as_deref(), Some("2"));
    }

    #[test]
    fn test_zero_capacity_clamped() {
        let cache = ResultCache::new(0);
        assert_eq!(cache.capacity(), 1);
        cache.insert(CacheKey::derive(&input("a")), "a".to_string());
        assert_eq!(cache.len(), 1);
    }
}
