//! Cart

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One purchasable configuration of a product in a cart.
///
/// A line is uniquely identified within a cart by its `(product_id, size)`
/// pair. The unit price is a snapshot taken when the line is first added;
/// merging further quantity onto the line never refreshes it, so the per-line
/// price a customer saw stays consistent until the line is removed and
/// re-added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Catalog id of the product.
    #[serde(rename = "id")]
    pub product_id: String,

    /// Product title, denormalized at add time.
    pub title: String,

    /// Image URL, denormalized at add time.
    pub image: String,

    /// Unit price snapshot taken at add time.
    #[serde(rename = "price", with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,

    /// Number of units; at least 1 for any persisted line.
    pub quantity: u32,

    /// Selected size, absent for products without a size dimension.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

impl CartLine {
    /// Whether this line is keyed by the given `(product_id, size)` pair.
    pub fn matches(&self, product_id: &str, size: Option<&str>) -> bool {
        self.product_id == product_id && self.size.as_deref() == size
    }

    /// The line total: unit price times quantity.
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// A user's shopping cart: an ordered list of lines with at most one line per
/// `(product_id, size)` pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a cart from stored lines, restoring the cart invariants on
    /// the way in.
    ///
    /// Zero-quantity lines are dropped (the reconciler never persists them,
    /// so any such entry in a stored document is stale), negative unit prices
    /// normalize to zero, and duplicate `(product_id, size)` entries merge by
    /// summing quantity with the first-seen price winning.
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        let mut cart = Self::new();

        for mut line in lines {
            if line.quantity == 0 {
                continue;
            }

            if line.unit_price < Decimal::ZERO {
                line.unit_price = Decimal::ZERO;
            }

            cart.add(line);
        }

        cart
    }

    /// The lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Consumes the cart, returning its lines.
    pub fn into_lines(self) -> Vec<CartLine> {
        self.lines
    }

    /// The number of distinct lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total units across all lines.
    pub fn total_quantity(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Merges a line into the cart.
    ///
    /// An existing line with the same `(product_id, size)` pair gains the new
    /// line's quantity; its snapshot price is left untouched. Otherwise the
    /// line is appended, preserving insertion order. A zero quantity on the
    /// incoming line is treated as 1.
    pub fn add(&mut self, line: CartLine) {
        let quantity = line.quantity.max(1);

        match self.index_of(&line.product_id, line.size.as_deref()) {
            Some(index) => {
                if let Some(existing) = self.lines.get_mut(index) {
                    existing.quantity = existing.quantity.saturating_add(quantity);
                }
            }
            None => self.lines.push(CartLine { quantity, ..line }),
        }
    }

    /// Adjusts a line's quantity by `delta`.
    ///
    /// A resulting quantity of zero or below removes the line entirely; a
    /// missing line is a silent no-op.
    pub fn change_quantity(&mut self, product_id: &str, size: Option<&str>, delta: i64) {
        let Some(index) = self.index_of(product_id, size) else {
            return;
        };

        let current = self.lines.get(index).map_or(0, |line| i64::from(line.quantity));
        let updated = current.saturating_add(delta);

        if updated <= 0 {
            self.lines.remove(index);
        } else if let Some(line) = self.lines.get_mut(index) {
            line.quantity = u32::try_from(updated).unwrap_or(u32::MAX);
        }
    }

    /// Removes the line keyed by `(product_id, size)`.
    ///
    /// The full key is required: two differently-sized lines of the same
    /// product are distinct entries, and removal must not collapse them.
    pub fn remove(&mut self, product_id: &str, size: Option<&str>) {
        self.lines.retain(|line| !line.matches(product_id, size));
    }

    /// Empties the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    fn index_of(&self, product_id: &str, size: Option<&str>) -> Option<usize> {
        self.lines
            .iter()
            .position(|line| line.matches(product_id, size))
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use super::*;

    fn line(product_id: &str, size: Option<&str>, quantity: u32) -> CartLine {
        CartLine {
            product_id: product_id.to_string(),
            title: format!("Product {product_id}"),
            image: format!("https://img.example/{product_id}.jpg"),
            unit_price: Decimal::from(200),
            quantity,
            size: size.map(str::to_string),
        }
    }

    #[test]
    fn add_appends_new_line() {
        let mut cart = Cart::new();

        cart.add(line("p1", Some("M"), 1));

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total_quantity(), 1);
    }

    #[test]
    fn add_same_key_twice_merges_quantities() {
        let mut cart = Cart::new();

        cart.add(line("p1", Some("M"), 2));
        cart.add(line("p1", Some("M"), 3));

        assert_eq!(cart.len(), 1, "same (product, size) must merge");
        assert_eq!(cart.total_quantity(), 5);
    }

    #[test]
    fn add_same_product_different_size_stays_separate() {
        let mut cart = Cart::new();

        cart.add(line("p1", Some("M"), 1));
        cart.add(line("p1", Some("L"), 1));

        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn add_does_not_refresh_snapshot_price() {
        let mut cart = Cart::new();
        cart.add(line("p1", Some("M"), 1));

        let mut repriced = line("p1", Some("M"), 1);
        repriced.unit_price = Decimal::from(150);
        cart.add(repriced);

        let merged = cart.lines().first().map(|l| l.unit_price);
        assert_eq!(merged, Some(Decimal::from(200)), "first-seen price wins");
    }

    #[test]
    fn add_zero_quantity_counts_as_one() {
        let mut cart = Cart::new();

        cart.add(line("p1", None, 0));

        assert_eq!(cart.total_quantity(), 1);
    }

    #[test]
    fn change_quantity_increments_and_decrements() {
        let mut cart = Cart::new();
        cart.add(line("p1", Some("M"), 1));

        cart.change_quantity("p1", Some("M"), 1);
        assert_eq!(cart.total_quantity(), 2);

        cart.change_quantity("p1", Some("M"), -1);
        assert_eq!(cart.total_quantity(), 1);
    }

    #[test]
    fn decrement_to_zero_removes_line() {
        let mut cart = Cart::new();
        cart.add(line("p1", Some("M"), 2));

        cart.change_quantity("p1", Some("M"), -1);
        cart.change_quantity("p1", Some("M"), -1);

        assert!(cart.is_empty(), "a line never persists at quantity zero");
        assert!(cart.lines().iter().all(|l| l.quantity >= 1));
    }

    #[test]
    fn change_quantity_unknown_line_is_noop() {
        let mut cart = Cart::new();
        cart.add(line("p1", Some("M"), 1));

        cart.change_quantity("p2", Some("M"), 1);
        cart.change_quantity("p1", Some("L"), 1);

        assert_eq!(cart.total_quantity(), 1);
    }

    #[test]
    fn remove_requires_matching_size() {
        let mut cart = Cart::new();
        cart.add(line("p1", Some("M"), 1));
        cart.add(line("p1", Some("L"), 1));

        cart.remove("p1", Some("M"));

        assert_eq!(cart.len(), 1);
        assert_eq!(
            cart.lines().first().and_then(|l| l.size.as_deref()),
            Some("L")
        );
    }

    #[test]
    fn clear_empties_cart() {
        let mut cart = Cart::new();
        cart.add(line("p1", Some("M"), 1));
        cart.add(line("p2", None, 4));

        cart.clear();

        assert!(cart.is_empty());
    }

    #[test]
    fn from_lines_drops_zero_quantity_entries() {
        let cart = Cart::from_lines(vec![line("p1", Some("M"), 0), line("p2", None, 1)]);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines().first().map(|l| l.product_id.as_str()), Some("p2"));
    }

    #[test]
    fn from_lines_merges_stored_duplicates() {
        let cart = Cart::from_lines(vec![line("p1", Some("M"), 1), line("p1", Some("M"), 2)]);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total_quantity(), 3);
    }

    #[test]
    fn from_lines_normalizes_negative_prices() {
        let mut bad = line("p1", None, 1);
        bad.unit_price = Decimal::from(-10);

        let cart = Cart::from_lines(vec![bad]);

        assert_eq!(
            cart.lines().first().map(|l| l.unit_price),
            Some(Decimal::ZERO)
        );
    }

    #[test]
    fn line_serializes_to_store_shape() -> TestResult {
        let json = serde_json::to_value(line("p1", Some("M"), 2))?;

        assert_eq!(json["id"], "p1");
        assert_eq!(json["price"], 200.0);
        assert_eq!(json["quantity"], 2);
        assert_eq!(json["size"], "M");

        Ok(())
    }

    #[test]
    fn sizeless_line_omits_size_field() -> TestResult {
        let json = serde_json::to_value(line("p1", None, 1))?;

        assert!(json.get("size").is_none(), "absent size must not serialize");

        Ok(())
    }

    #[test]
    fn line_deserializes_from_store_document() -> TestResult {
        let json = r#"{"id":"p9","title":"Tee","image":"https://img.example/p9.jpg","price":499.5,"quantity":2,"size":"XL"}"#;

        let parsed: CartLine = serde_json::from_str(json)?;

        assert_eq!(parsed.product_id, "p9");
        assert_eq!(parsed.unit_price, Decimal::new(4995, 1));
        assert_eq!(parsed.size.as_deref(), Some("XL"));

        Ok(())
    }
}
