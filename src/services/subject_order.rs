//! Canonical display order for subject categories.
//!
//! The order tables are track-independent: track only decides which subjects
//! a class takes, never how they are sorted.

/// Sentinel order for categories absent from the table; sorts last.
pub(crate) const UNKNOWN_ORDER: u16 = 999;

#[derive(Debug, Clone, Copy)]
pub(crate) struct CategoryOrder {
    pub(crate) category: &'static str,
    pub(crate) order: u16,
    pub(crate) short_code: &'static str,
}

const fn entry(category: &'static str, order: u16, short_code: &'static str) -> CategoryOrder {
    CategoryOrder { category, order, short_code }
}

static ORDER_GRADES_7_8: &[CategoryOrder] = &[
    entry("MATH", 1, "Mat"),
    entry("LIT", 2, "Lit"),
    entry("ENG", 3, "Eng"),
    entry("PHY", 4, "Phy"),
    entry("BIO", 5, "Bio"),
    entry("HIS", 6, "His"),
    entry("GEO", 7, "Geo"),
    entry("CIV", 8, "Civ"),
    entry("TEC", 9, "Tec"),
    entry("ICT", 10, "Ict"),
    entry("PE", 11, "PE"),
    entry("MUS", 12, "Mus"),
    entry("ART", 13, "Art"),
];

// Chemistry enters the ladder at grade 9.
static ORDER_GRADE_9: &[CategoryOrder] = &[
    entry("MATH", 1, "Mat"),
    entry("LIT", 2, "Lit"),
    entry("ENG", 3, "Eng"),
    entry("PHY", 4, "Phy"),
    entry("CHE", 5, "Che"),
    entry("BIO", 6, "Bio"),
    entry("HIS", 7, "His"),
    entry("GEO", 8, "Geo"),
    entry("CIV", 9, "Civ"),
    entry("TEC", 10, "Tec"),
    entry("ICT", 11, "Ict"),
    entry("PE", 12, "PE"),
    entry("MUS", 13, "Mus"),
    entry("ART", 14, "Art"),
];

// Defense education joins the senior ladder; music and art leave it.
static ORDER_GRADES_10_12: &[CategoryOrder] = &[
    entry("MATH", 1, "Mat"),
    entry("LIT", 2, "Lit"),
    entry("ENG", 3, "Eng"),
    entry("PHY", 4, "Phy"),
    entry("CHE", 5, "Che"),
    entry("BIO", 6, "Bio"),
    entry("HIS", 7, "His"),
    entry("GEO", 8, "Geo"),
    entry("CIV", 9, "Civ"),
    entry("TEC", 10, "Tec"),
    entry("ICT", 11, "Ict"),
    entry("PE", 12, "PE"),
    entry("DEF", 13, "Def"),
];

pub(crate) fn order_for(grade: i32) -> &'static [CategoryOrder] {
    match grade {
        g if g <= 8 => ORDER_GRADES_7_8,
        9 => ORDER_GRADE_9,
        _ => ORDER_GRADES_10_12,
    }
}

/// Category of a subject code: the portion before the first `-`, `_` or `.`.
/// Codes without a separator are their own category.
pub(crate) fn category_of(code: &str) -> &str {
    code.split(|c: char| matches!(c, '-' | '_' | '.')).next().unwrap_or(code)
}

/// Display position and short label for a subject code at a grade level.
/// Never fails: unknown categories sort last under [`UNKNOWN_ORDER`] and
/// keep the raw code as their label.
pub(crate) fn position<'a>(grade: i32, code: &'a str) -> (u16, &'a str) {
    let category = category_of(code);
    for candidate in order_for(grade) {
        if candidate.category.eq_ignore_ascii_case(category) {
            return (candidate.order, candidate.short_code);
        }
    }
    (UNKNOWN_ORDER, code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_stops_at_first_separator() {
        assert_eq!(category_of("MATH-9A"), "MATH");
        assert_eq!(category_of("MATH_9A"), "MATH");
        assert_eq!(category_of("MATH.9A"), "MATH");
        assert_eq!(category_of("PE"), "PE");
    }

    #[test]
    fn math_leads_every_ladder() {
        for grade in [7, 8, 9, 10, 11, 12] {
            let (order, short) = position(grade, "MATH-X");
            assert_eq!(order, 1, "grade {grade}");
            assert_eq!(short, "Mat");
        }
    }

    #[test]
    fn chemistry_joins_at_grade_nine() {
        let (order, short) = position(8, "CHE-8A");
        assert_eq!(order, UNKNOWN_ORDER);
        assert_eq!(short, "CHE-8A");

        let (order, short) = position(9, "CHE-9A");
        assert_eq!(order, 5);
        assert_eq!(short, "Che");
    }

    #[test]
    fn senior_ladder_swaps_arts_for_defense() {
        let (order, _) = position(12, "DEF-12");
        assert_eq!(order, 13);
        let (order, label) = position(12, "MUS-12");
        assert_eq!(order, UNKNOWN_ORDER);
        assert_eq!(label, "MUS-12");
    }

    #[test]
    fn unknown_category_sorts_last_with_raw_label() {
        let (order, label) = position(10, "ASTRO-10");
        assert_eq!(order, UNKNOWN_ORDER);
        assert_eq!(label, "ASTRO-10");
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let (order, short) = position(7, "math-7b");
        assert_eq!(order, 1);
        assert_eq!(short, "Mat");
    }
}
