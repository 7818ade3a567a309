/// Icon and colour used when showing an agent's faction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FactionStyle {
    pub logo: &'static str,
    pub color: &'static str,
}

pub const RESISTANCE: FactionStyle = FactionStyle {
    logo: "icons/Resistance_Logo.webp",
    color: "#00c2ff",
};

pub const ENLIGHTENED: FactionStyle = FactionStyle {
    logo: "icons/Enlightened_Logo.webp",
    color: "#00ef6b",
};

impl FactionStyle {
    /// Pick the style for a faction value. Only "res" is recognised;
    /// everything else gets the enlightened style.
    pub fn for_faction(faction: &str) -> Self {
        if faction.eq_ignore_ascii_case("res") {
            RESISTANCE
        } else {
            ENLIGHTENED
        }
    }
}
