//! Ordering of filtered products.

use std::cmp::Ordering;

use crate::catalog::NormalizedProduct;
use crate::search::SortKey;

/// Sort products in place. The sort is stable: products with equal keys
/// keep their filter-stage order, and [`SortKey::Relevance`] leaves the
/// slice untouched.
pub fn sort_products(products: &mut [&NormalizedProduct], key: SortKey) {
    match key {
        SortKey::Relevance => {}
        SortKey::PriceAsc => products.sort_by(|a, b| compare_f64(a.price, b.price)),
        SortKey::PriceDesc => products.sort_by(|a, b| compare_f64(b.price, a.price)),
        SortKey::RatingDesc => products.sort_by(|a, b| compare_f64(b.rating, a.rating)),
        SortKey::NameAsc => products.sort_by(|a, b| collate(&a.name, &b.name)),
    }
}

fn compare_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Compare two names the way a reader expects an alphabetical list.
///
/// Primary: letters with accents folded, ignoring case. Secondary: accents
/// (unaccented first). Tertiary: case (lowercase first).
pub fn collate(a: &str, b: &str) -> Ordering {
    let primary = fold(a).cmp(fold(b));
    if primary != Ordering::Equal {
        return primary;
    }
    let secondary = a.to_lowercase().cmp(&b.to_lowercase());
    if secondary != Ordering::Equal {
        return secondary;
    }
    b.cmp(a)
}

fn fold(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars()
        .flat_map(char::to_lowercase)
        .flat_map(|c| fold_char(c).chars())
}

/// Base letters for the Latin-1 accented range.
fn fold_char(c: char) -> FoldedChar {
    let base = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'ç' => 'c',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ñ' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ý' | 'ÿ' => 'y',
        'æ' => return FoldedChar::Pair('a', 'e'),
        'œ' => return FoldedChar::Pair('o', 'e'),
        'ß' => return FoldedChar::Pair('s', 's'),
        other => other,
    };
    FoldedChar::Single(base)
}

enum FoldedChar {
    Single(char),
    Pair(char, char),
}

impl FoldedChar {
    fn chars(self) -> impl Iterator<Item = char> {
        let (first, second) = match self {
            FoldedChar::Single(c) => (c, None),
            FoldedChar::Pair(a, b) => (a, Some(b)),
        };
        std::iter::once(first).chain(second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ProductId;

    fn product(id: &str, name: &str, price: f64, rating: f64) -> NormalizedProduct {
        NormalizedProduct {
            id: ProductId::try_new(id).unwrap(),
            name: name.to_string(),
            description: String::new(),
            price,
            image_url: String::new(),
            category_name: "Other".to_string(),
            stock_quantity: 0,
            rating,
            review_count: 0,
            seller_name: None,
        }
    }

    fn sorted_ids(items: &[NormalizedProduct], key: SortKey) -> Vec<String> {
        let mut refs: Vec<_> = items.iter().collect();
        sort_products(&mut refs, key);
        refs.iter().map(|p| p.id.to_string()).collect()
    }

    #[test]
    fn test_price_orders() {
        let items = vec![
            product("a", "A", 10.0, 0.0),
            product("b", "B", 5.0, 0.0),
            product("c", "C", 20.0, 0.0),
        ];
        assert_eq!(sorted_ids(&items, SortKey::PriceAsc), vec!["b", "a", "c"]);
        assert_eq!(sorted_ids(&items, SortKey::PriceDesc), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_rating_desc_is_stable() {
        let items = vec![
            product("a", "A", 0.0, 4.0),
            product("b", "B", 0.0, 5.0),
            product("c", "C", 0.0, 4.0),
        ];
        assert_eq!(sorted_ids(&items, SortKey::RatingDesc), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_relevance_keeps_order() {
        let items = vec![product("z", "Z", 3.0, 1.0), product("a", "A", 1.0, 5.0)];
        assert_eq!(sorted_ids(&items, SortKey::Relevance), vec!["z", "a"]);
    }

    #[test]
    fn test_name_sort_ignores_case_and_accents() {
        let items = vec![
            product("1", "zèbre", 0.0, 0.0),
            product("2", "Éclair", 0.0, 0.0),
            product("3", "ananas", 0.0, 0.0),
            product("4", "Fraise", 0.0, 0.0),
        ];
        assert_eq!(sorted_ids(&items, SortKey::NameAsc), vec!["3", "2", "4", "1"]);
    }

    #[test]
    fn test_collate_tiebreaks() {
        assert_eq!(collate("cote", "côte"), Ordering::Less);
        assert_eq!(collate("apple", "Apple"), Ordering::Less);
        assert_eq!(collate("Mug", "Mug"), Ordering::Equal);
        assert_eq!(collate("Straße", "strasse"), Ordering::Greater);
    }
}
