//! Asset page registry
//!
//! Maps the navigation parameter to a statically known page. Built once per
//! isolate; lookups accept the asset id or one of its legacy aliases.

use std::fmt;

use crate::dashboard::{self, RenderFn};

/// Static description of a tracked asset
#[derive(Debug)]
pub struct AssetProfile {
    /// Navigation id, also used for `PREDICTION_URL_<ID>`
    pub id: &'static str,
    /// CoinGecko coin id
    pub coin_id: &'static str,
    pub name: &'static str,
    pub symbol: &'static str,
    /// Landing page blurb
    pub blurb: &'static str,
    /// Team member who owns the asset's forecast, and their role
    pub owner: &'static str,
    pub role: &'static str,
    /// Older page names still found in shared links
    pub aliases: &'static [&'static str],
    pub default_prediction_url: Option<&'static str>,
}

/// Assets shown on the landing page, in display order
pub const TRACKED_ASSETS: &[AssetProfile] = &[
    AssetProfile {
        id: "ethereum",
        coin_id: "ethereum",
        name: "Ethereum",
        symbol: "ETH",
        blurb: "Ethereum forecasting using an Optuna-tuned XGBoost model with live API integration.",
        owner: "Twinkle",
        role: "Optuna-tuned XGBoost model for Ethereum forecasting, served through its own prediction API.",
        aliases: &["student_twinkle"],
        default_prediction_url: Some("https://fastapiethereum.onrender.com"),
    },
    AssetProfile {
        id: "solana",
        coin_id: "solana",
        name: "Solana",
        symbol: "SOL",
        blurb: "Feature-engineered forecasting model for trend stability and pattern recognition.",
        owner: "Nidhi",
        role: "Solana Integration and Visualization",
        aliases: &["student_nidhi"],
        default_prediction_url: None,
    },
    AssetProfile {
        id: "xrp",
        coin_id: "ripple",
        name: "XRP",
        symbol: "XRP",
        blurb: "Real-time API integration backed by a validation pipeline.",
        owner: "Rohan",
        role: "XRP Deployment & Validation",
        aliases: &["student_rohan"],
        default_prediction_url: None,
    },
    AssetProfile {
        id: "bitcoin",
        coin_id: "bitcoin",
        name: "Bitcoin",
        symbol: "BTC",
        blurb: "Next-day high predictions from optimized ML regression models.",
        owner: "Paul",
        role: "Bitcoin Model & API Setup",
        aliases: &["student_paul"],
        default_prediction_url: None,
    },
];

/// A routable page
#[derive(Clone, Copy)]
pub struct AssetPage {
    pub profile: &'static AssetProfile,
    pub render: RenderFn,
}

impl fmt::Debug for AssetPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetPage")
            .field("id", &self.profile.id)
            .finish_non_exhaustive()
    }
}

impl AssetPage {
    fn answers_to(&self, name: &str) -> bool {
        self.profile.id.eq_ignore_ascii_case(name)
            || self
                .profile
                .aliases
                .iter()
                .any(|alias| alias.eq_ignore_ascii_case(name))
    }
}

/// Ordered set of asset pages
#[derive(Debug, Clone, Default)]
pub struct AssetRegistry {
    pages: Vec<AssetPage>,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every tracked asset, rendered with the standard asset dashboard
    pub fn with_tracked_assets() -> Self {
        let mut registry = Self::new();
        for profile in TRACKED_ASSETS {
            registry.register(profile, dashboard::render_asset_page);
        }
        registry
    }

    /// Add a page; a later registration under the same id replaces the earlier one
    pub fn register(&mut self, profile: &'static AssetProfile, render: RenderFn) {
        let page = AssetPage { profile, render };
        match self.pages.iter_mut().find(|p| p.profile.id == profile.id) {
            Some(existing) => *existing = page,
            None => self.pages.push(page),
        }
    }

    /// Page registered under `name` (id or alias, case-insensitive)
    pub fn resolve(&self, name: &str) -> Option<&AssetPage> {
        let name = name.trim();
        self.pages.iter().find(|page| page.answers_to(name))
    }

    pub fn pages(&self) -> &[AssetPage] {
        &self.pages
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracked_assets_registered_in_order() {
        let registry = AssetRegistry::with_tracked_assets();
        let ids: Vec<_> = registry.pages().iter().map(|p| p.profile.id).collect();
        assert_eq!(ids, vec!["ethereum", "solana", "xrp", "bitcoin"]);
    }

    #[test]
    fn test_resolve_by_id_and_alias() {
        let registry = AssetRegistry::with_tracked_assets();

        assert_eq!(registry.resolve("ethereum").map(|p| p.profile.symbol), Some("ETH"));
        assert_eq!(registry.resolve(" Bitcoin ").map(|p| p.profile.symbol), Some("BTC"));
        assert_eq!(
            registry.resolve("student_twinkle").map(|p| p.profile.id),
            Some("ethereum")
        );
        assert_eq!(registry.resolve("xrp").map(|p| p.profile.coin_id), Some("ripple"));
    }

    #[test]
    fn test_resolve_unknown() {
        let registry = AssetRegistry::with_tracked_assets();
        assert!(registry.resolve("dogecoin").is_none());
        assert!(registry.resolve("").is_none());
    }

    #[test]
    fn test_register_replaces_same_id() {
        let mut registry = AssetRegistry::with_tracked_assets();
        registry.register(&TRACKED_ASSETS[0], dashboard::render_asset_page);
        assert_eq!(registry.pages().len(), TRACKED_ASSETS.len());
    }

    #[test]
    fn test_every_asset_has_an_owner() {
        for asset in TRACKED_ASSETS {
            assert!(!asset.owner.is_empty(), "{}", asset.id);
            assert!(!asset.role.is_empty(), "{}", asset.id);
        }
    }

    #[test]
    fn test_ids_and_aliases_are_unique() {
        let mut names: Vec<&str> = TRACKED_ASSETS
            .iter()
            .flat_map(|a| std::iter::once(a.id).chain(a.aliases.iter().copied()))
            .collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }
}
