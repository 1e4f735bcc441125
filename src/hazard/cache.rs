// ==========================================
// 防災備蓄推奨システム - リスク評価キャッシュ
// ==========================================
// 職責: 住所をキーとしたセッションスコープのリスク評価キャッシュ
// 制約: 容量上限付き（FIFO淘汰）。成功した評価のみ保存する
// ==========================================

use crate::domain::risk::RiskAssessment;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, VecDeque};

/// 既定のキャッシュ容量
pub const DEFAULT_CACHE_CAPACITY: usize = 128;

/// キャッシュエントリ（取得時刻つき）
struct CacheEntry {
    assessment: RiskAssessment,
    fetched_at: DateTime<Utc>,
}

// ==========================================
// RiskCache - 住所別リスク評価キャッシュ
// ==========================================
pub struct RiskCache {
    capacity: usize,
    entries: HashMap<String, CacheEntry>,
    insertion_order: VecDeque<String>,
}

impl Default for RiskCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl RiskCache {
    /// 容量を指定して作る（0 は 1 に切り上げ）
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
            insertion_order: VecDeque::new(),
        }
    }

    /// キャッシュから取得
    pub fn get(&self, address: &str) -> Option<&RiskAssessment> {
        self.entries.get(address).map(|entry| &entry.assessment)
    }

    /// エントリの取得時刻（観測用）
    pub fn fetched_at(&self, address: &str) -> Option<DateTime<Utc>> {
        self.entries.get(address).map(|entry| entry.fetched_at)
    }

    /// キャッシュへ保存（容量超過時は最古の住所を淘汰）
    pub fn insert(&mut self, address: String, assessment: RiskAssessment) {
        let entry = CacheEntry {
            assessment,
            fetched_at: Utc::now(),
        };

        if self.entries.contains_key(&address) {
            // 既存キーの上書きは順序を変えない
            self.entries.insert(address, entry);
            return;
        }

        while self.entries.len() >= self.capacity {
            if let Some(oldest) = self.insertion_order.pop_front() {
                self.entries.remove(&oldest);
                tracing::debug!("リスクキャッシュから淘汰: {}", oldest);
            } else {
                break;
            }
        }

        self.insertion_order.push_back(address.clone());
        self.entries.insert(address, entry);
    }

    /// 保存件数
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 空か
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 全消去
    pub fn clear(&mut self) {
        self.entries.clear();
        self.insertion_order.clear();
    }
}
