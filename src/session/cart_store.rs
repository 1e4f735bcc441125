// ==========================================
// 防災備蓄推奨システム - カート状態ストア
// ==========================================
// 職責: 備蓄品カートと買い物かご（具体的商品）の一体管理
// 不変条件 I1: 買い物かご行は対応する備蓄品カート行が存在する間のみ
//             存在できる（削除はカスケードする）
// 不変条件 I2: 同一備蓄品に対する買い物かご行は高々1つ
// 失敗セマンティクス: 不変条件に反する操作は警告ログ付きの無言no-op。
//                     呼び出し側は成功を仮定せず状態を読み直すこと
// ==========================================

use crate::domain::product::{ConcreteCartLine, ConcreteProduct};
use crate::domain::stock_item::CartLine;
use crate::domain::supply::{supplies_equal, SupplySummary};

/// 既定の組織形態ID（民間企業オフィス）
pub const DEFAULT_ORGANIZATION_TYPE_ID: i64 = 1;

// ==========================================
// CartStore - セッション状態コンテナ
// ==========================================
// すべての変更は名前付き操作を通す（フィールドの直接書き換えをしない）
pub struct CartStore {
    /// 備蓄品カート（抽象的な品目カテゴリ）
    stock_cart: Vec<CartLine>,

    /// 買い物かご（具体的商品の選択）
    concrete_cart: Vec<ConcreteCartLine>,

    /// 選択中の組織形態ID
    organization_type_id: i64,

    /// 人数（None = 未入力）
    headcount: Option<i64>,

    /// チャット絞り込みで使う備蓄品リスト（簡略版）
    supplies: Vec<SupplySummary>,
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CartStore {
    /// 空のストアを作る
    pub fn new() -> Self {
        Self {
            stock_cart: Vec::new(),
            concrete_cart: Vec::new(),
            organization_type_id: DEFAULT_ORGANIZATION_TYPE_ID,
            headcount: None,
            supplies: Vec::new(),
        }
    }

    // ==========================================
    // セッションスカラー
    // ==========================================

    pub fn organization_type_id(&self) -> i64 {
        self.organization_type_id
    }

    pub fn set_organization_type_id(&mut self, organization_type_id: i64) {
        self.organization_type_id = organization_type_id;
    }

    pub fn headcount(&self) -> Option<i64> {
        self.headcount
    }

    pub fn set_headcount(&mut self, headcount: Option<i64>) {
        self.headcount = headcount;
    }

    // ==========================================
    // 備蓄品カート操作
    // ==========================================

    pub fn stock_cart(&self) -> &[CartLine] {
        &self.stock_cart
    }

    /// 備蓄品カートへ行を追加する
    ///
    /// - 選択中の組織形態に関連しない品目は追加しない（警告ログのみ）
    /// - 同じ備蓄品IDの行が既にあれば数量を合算する（置き換えではない）
    pub fn add_stock_line(&mut self, line: CartLine) {
        if !line.item.applies_to_organization(self.organization_type_id) {
            tracing::warn!(
                "品目「{}」は選択中の組織形態({})に関連しないため追加しません",
                line.item.name,
                self.organization_type_id
            );
            return;
        }

        match self
            .stock_cart
            .iter_mut()
            .find(|existing| existing.stock_item_id() == line.stock_item_id())
        {
            Some(existing) => {
                existing.calculated_qty += line.calculated_qty;
            }
            None => {
                self.stock_cart.push(line);
            }
        }
    }

    /// 備蓄品カートから行を削除する（買い物かごへカスケード）
    pub fn remove_stock_line(&mut self, stock_item_id: i64) {
        self.stock_cart
            .retain(|line| line.stock_item_id() != stock_item_id);

        // I1: 対応する買い物かご行も削除する
        self.concrete_cart
            .retain(|line| line.stock_item_id() != stock_item_id);
    }

    /// 品目名で備蓄品カートから行を削除する（買い物かごへカスケード）
    ///
    /// AI照合は品目名しか持たないためIDではなく名前で消す
    pub fn remove_stock_line_by_name(&mut self, name: &str) {
        let removed_ids: Vec<i64> = self
            .stock_cart
            .iter()
            .filter(|line| line.name() == name)
            .map(|line| line.stock_item_id())
            .collect();

        if removed_ids.is_empty() {
            tracing::warn!("品目「{}」は備蓄品カートに存在しません", name);
            return;
        }

        self.stock_cart.retain(|line| line.name() != name);
        self.concrete_cart
            .retain(|line| !removed_ids.contains(&line.stock_item_id()));
    }

    /// 備蓄品カート行の数量を更新する（買い物かご数量も同期）
    pub fn update_stock_line_quantity(&mut self, stock_item_id: i64, quantity: f64) {
        let mut found = false;
        for line in &mut self.stock_cart {
            if line.stock_item_id() == stock_item_id {
                line.calculated_qty = quantity;
                found = true;
            }
        }

        if !found {
            tracing::warn!("備蓄品ID {} はカートに存在しません", stock_item_id);
            return;
        }

        // 対応する買い物かご行の数量を同期する
        for line in &mut self.concrete_cart {
            if line.stock_item_id() == stock_item_id {
                line.quantity = quantity;
            }
        }
    }

    /// 備蓄品カートを空にする（買い物かごも道連れで空にする）
    pub fn clear_stock_cart(&mut self) {
        self.stock_cart.clear();
        self.concrete_cart.clear();
    }

    /// 備蓄品カートを推奨結果で置き換える（人数・組織変更時の再計算用）
    ///
    /// 買い物かごは I1 を保つため、新しいカートに親が無い行を落とし、
    /// 残った行の数量を親と同期する
    pub fn replace_stock_cart(&mut self, lines: Vec<CartLine>) {
        self.stock_cart = lines;

        let stock_cart = &self.stock_cart;
        self.concrete_cart.retain(|concrete| {
            stock_cart
                .iter()
                .any(|line| line.stock_item_id() == concrete.stock_item_id())
        });
        for concrete in &mut self.concrete_cart {
            if let Some(parent) = self
                .stock_cart
                .iter()
                .find(|line| line.stock_item_id() == concrete.stock_item_id())
            {
                concrete.quantity = parent.calculated_qty;
            }
        }
    }

    // ==========================================
    // 買い物かご操作
    // ==========================================

    pub fn concrete_cart(&self) -> &[ConcreteCartLine] {
        &self.concrete_cart
    }

    /// 買い物かごへ商品を追加する
    ///
    /// - 対応する備蓄品カート行が無ければ追加しない（I1、警告ログのみ）
    /// - 同じ商品IDの行があれば数量を更新する
    /// - 同じ備蓄品IDの行があれば置き換える（I2）
    pub fn add_concrete_line(&mut self, product: ConcreteProduct, quantity: f64) {
        let parent_exists = self
            .stock_cart
            .iter()
            .any(|line| line.stock_item_id() == product.recommended_stock_item_id);

        if !parent_exists {
            tracing::warn!(
                "備蓄品ID {} がカートに無いため商品「{}」を追加しません",
                product.recommended_stock_item_id,
                product.product_name
            );
            return;
        }

        // 同一商品 → 数量のみ更新
        if let Some(existing) = self
            .concrete_cart
            .iter_mut()
            .find(|line| line.product_id() == product.id)
        {
            existing.quantity = quantity;
            return;
        }

        // 同一備蓄品の別商品 → 置き換え（I2）
        if let Some(existing) = self
            .concrete_cart
            .iter_mut()
            .find(|line| line.stock_item_id() == product.recommended_stock_item_id)
        {
            *existing = ConcreteCartLine::new(product, quantity);
            return;
        }

        self.concrete_cart
            .push(ConcreteCartLine::new(product, quantity));
    }

    /// 買い物かごから商品を削除する（備蓄品カートへは波及しない）
    pub fn remove_concrete_line(&mut self, product_id: i64) {
        self.concrete_cart
            .retain(|line| line.product_id() != product_id);
    }

    /// 買い物かごを空にする（備蓄品カートは保持する）
    pub fn clear_concrete_cart(&mut self) {
        self.concrete_cart.clear();
    }

    /// 買い物かご行の数量を更新する（上方向への同期はしない）
    pub fn update_concrete_line_quantity(&mut self, product_id: i64, quantity: f64) {
        for line in &mut self.concrete_cart {
            if line.product_id() == product_id {
                line.quantity = quantity;
            }
        }
    }

    /// 備蓄品IDから買い物かご行を引く（I2 により高々1件）
    pub fn lookup_concrete_line_by_stock_item_id(
        &self,
        stock_item_id: i64,
    ) -> Option<&ConcreteCartLine> {
        self.concrete_cart
            .iter()
            .find(|line| line.stock_item_id() == stock_item_id)
    }

    // ==========================================
    // 備蓄品リスト（簡略版）
    // ==========================================

    pub fn supplies(&self) -> &[SupplySummary] {
        &self.supplies
    }

    /// 備蓄品リストを置き換える
    ///
    /// # 戻り値
    /// 内容が実際に変化したか。同一内容なら置き換えず false
    pub fn replace_supplies(&mut self, supplies: Vec<SupplySummary>) -> bool {
        if supplies_equal(&self.supplies, &supplies) {
            return false;
        }
        self.supplies = supplies;
        true
    }
}
