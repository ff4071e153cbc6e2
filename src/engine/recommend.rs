//! Technology recommendations derived from a verdict.
//!
//! Selection depends only on the numbers and the verdict; text comes from
//! per-kind templates so that the same request yields the same list in every
//! language.

use std::fmt;

use serde::Serialize;

use super::locale::{Locale, Localized};
use super::types::{TrafficLight, VoltageTier};

/// What a recommendation is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    /// Rooftop PV.
    Solar,
    /// Battery storage.
    Battery,
    /// Smart EV charging.
    EvCharging,
    /// Heat pump.
    HeatPump,
    /// Grid-friendly behavior / demand response.
    GridFriendly,
    /// Community energy.
    Community,
}

impl RecommendationKind {
    /// Kinds that shift or absorb load.
    pub fn is_flexible_load(self) -> bool {
        matches!(
            self,
            Self::Battery | Self::EvCharging | Self::HeatPump | Self::GridFriendly
        )
    }
}

/// Urgency, highest first in ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        })
    }
}

/// One rendered suggestion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    /// Topic.
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    /// Urgency.
    pub priority: Priority,
    /// Short title.
    pub title: String,
    /// One-paragraph explanation.
    pub description: String,
    /// Bullet points.
    pub benefits: Vec<String>,
}

/// Inputs the selection rules look at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommendationContext {
    /// Remaining capacity of the checked tier (kW).
    pub remaining_kw: f64,
    /// Requested power (kW).
    pub kw_requested: f64,
    /// Effective tier.
    pub tier: VoltageTier,
    /// Verdict.
    pub traffic_light: TrafficLight,
}

impl RecommendationContext {
    /// Headroom as a multiple of the request, with requests below 1 kW
    /// counted as 1 kW.
    pub fn capacity_ratio(&self) -> f64 {
        capacity_ratio(self.remaining_kw, self.kw_requested)
    }
}

/// `remaining / max(requested, 1)`.
pub fn capacity_ratio(remaining_kw: f64, kw_requested: f64) -> f64 {
    remaining_kw / kw_requested.max(1.0)
}

/// Picks kinds and priorities, ordered by priority and stable in rule order.
pub fn select(ctx: &RecommendationContext) -> Vec<(RecommendationKind, Priority)> {
    let ratio = ctx.capacity_ratio();
    let mut picks = Vec::with_capacity(6);

    if ratio > 3.0 {
        picks.push((RecommendationKind::Solar, Priority::High));
    } else if ratio > 1.5 {
        picks.push((RecommendationKind::Solar, Priority::Medium));
    }

    match ctx.traffic_light {
        TrafficLight::Yellow => picks.push((RecommendationKind::Battery, Priority::Medium)),
        TrafficLight::Red => picks.push((RecommendationKind::Battery, Priority::High)),
        TrafficLight::Green => {}
    }

    if ratio > 2.0 && ctx.kw_requested < 100.0 {
        picks.push((RecommendationKind::EvCharging, Priority::Medium));
    }

    if ratio > 1.5 && ctx.tier.is_low() {
        picks.push((RecommendationKind::HeatPump, Priority::Medium));
    }

    match ctx.traffic_light {
        TrafficLight::Red => picks.push((RecommendationKind::GridFriendly, Priority::High)),
        TrafficLight::Yellow => picks.push((RecommendationKind::GridFriendly, Priority::Medium)),
        TrafficLight::Green => {}
    }

    if ctx.traffic_light == TrafficLight::Red {
        picks.push((RecommendationKind::Community, Priority::Medium));
    } else if !ctx.tier.is_low() {
        picks.push((RecommendationKind::Community, Priority::Low));
    }

    // sort_by_key is stable
    picks.sort_by_key(|&(_, priority)| priority);
    picks
}

/// Selects and renders recommendations in `locale`.
pub fn recommend(ctx: &RecommendationContext, locale: Locale) -> Vec<Recommendation> {
    select(ctx)
        .into_iter()
        .map(|(kind, priority)| {
            let t = template(kind);
            Recommendation {
                kind,
                priority,
                title: t.title.get(locale).to_string(),
                description: t.description.get(locale).to_string(),
                benefits: t.benefits.iter().map(|b| b.get(locale).to_string()).collect(),
            }
        })
        .collect()
}

struct Template {
    title: Localized,
    description: Localized,
    benefits: &'static [Localized],
}

fn template(kind: RecommendationKind) -> &'static Template {
    match kind {
        RecommendationKind::Solar => &SOLAR,
        RecommendationKind::Battery => &BATTERY,
        RecommendationKind::EvCharging => &EV_CHARGING,
        RecommendationKind::HeatPump => &HEAT_PUMP,
        RecommendationKind::GridFriendly => &GRID_FRIENDLY,
        RecommendationKind::Community => &COMMUNITY,
    }
}

const SOLAR: Template = Template {
    title: Localized {
        en: "Add rooftop solar",
        de: "Photovoltaik ergänzen",
    },
    description: Localized {
        en: "The local grid has room for additional generation. A PV system lowers your energy bill and feeds surplus power back.",
        de: "Das lokale Netz hat Platz für zusätzliche Erzeugung. Eine PV-Anlage senkt Ihre Energiekosten und speist Überschüsse ein.",
    },
    benefits: &[
        Localized {
            en: "Lower electricity costs",
            de: "Geringere Stromkosten",
        },
        Localized {
            en: "Feed-in compensation",
            de: "Einspeisevergütung",
        },
        Localized {
            en: "Fewer CO2 emissions",
            de: "Weniger CO2-Emissionen",
        },
    ],
};

const BATTERY: Template = Template {
    title: Localized {
        en: "Install battery storage",
        de: "Batteriespeicher installieren",
    },
    description: Localized {
        en: "A battery shifts consumption and generation away from peak hours and reduces the capacity you need from the grid.",
        de: "Ein Speicher verlagert Verbrauch und Erzeugung aus den Spitzenzeiten und senkt die benötigte Netzkapazität.",
    },
    benefits: &[
        Localized {
            en: "Peak shaving",
            de: "Lastspitzenkappung",
        },
        Localized {
            en: "Higher self-consumption",
            de: "Höherer Eigenverbrauch",
        },
        Localized {
            en: "Backup during outages",
            de: "Notstrom bei Ausfällen",
        },
    ],
};

const EV_CHARGING: Template = Template {
    title: Localized {
        en: "Smart EV charging",
        de: "Intelligentes Laden",
    },
    description: Localized {
        en: "There is headroom for a wallbox. Controlled charging keeps the load off the evening peak.",
        de: "Es gibt Reserven für eine Wallbox. Gesteuertes Laden hält die Last aus der Abendspitze heraus.",
    },
    benefits: &[
        Localized {
            en: "Charge with your own solar power",
            de: "Laden mit eigenem Solarstrom",
        },
        Localized {
            en: "Reduced grid fees for controllable loads",
            de: "Reduzierte Netzentgelte für steuerbare Verbraucher",
        },
    ],
};

const HEAT_PUMP: Template = Template {
    title: Localized {
        en: "Switch to a heat pump",
        de: "Auf Wärmepumpe umsteigen",
    },
    description: Localized {
        en: "The low-voltage connection can carry a heat pump. It replaces fossil heating with efficient electric heat.",
        de: "Der Niederspannungsanschluss kann eine Wärmepumpe tragen. Sie ersetzt fossile Heizung durch effiziente elektrische Wärme.",
    },
    benefits: &[
        Localized {
            en: "Efficient heating",
            de: "Effizientes Heizen",
        },
        Localized {
            en: "Eligible for subsidies",
            de: "Förderfähig",
        },
    ],
};

const GRID_FRIENDLY: Template = Template {
    title: Localized {
        en: "Use power grid-friendly",
        de: "Netzdienlich verbrauchen",
    },
    description: Localized {
        en: "Move flexible consumption to hours with spare capacity, for example midday or night.",
        de: "Verlagern Sie flexiblen Verbrauch in Zeiten mit freier Kapazität, etwa mittags oder nachts.",
    },
    benefits: &[
        Localized {
            en: "Time-of-use savings",
            de: "Einsparungen durch zeitvariable Tarife",
        },
        Localized {
            en: "Relieves the local grid",
            de: "Entlastet das lokale Netz",
        },
    ],
};

const COMMUNITY: Template = Template {
    title: Localized {
        en: "Join a community energy project",
        de: "Energiegemeinschaft beitreten",
    },
    description: Localized {
        en: "Share generation and storage with neighbors to use existing capacity more evenly.",
        de: "Teilen Sie Erzeugung und Speicher mit Nachbarn, um vorhandene Kapazität gleichmäßiger zu nutzen.",
    },
    benefits: &[
        Localized {
            en: "Shared investment",
            de: "Geteilte Investition",
        },
        Localized {
            en: "Local energy supply",
            de: "Lokale Energieversorgung",
        },
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(remaining: f64, requested: f64, tier: VoltageTier, light: TrafficLight) -> RecommendationContext {
        RecommendationContext {
            remaining_kw: remaining,
            kw_requested: requested,
            tier,
            traffic_light: light,
        }
    }

    fn kinds(picks: &[(RecommendationKind, Priority)]) -> Vec<RecommendationKind> {
        picks.iter().map(|&(k, _)| k).collect()
    }

    #[test]
    fn green_with_large_headroom() {
        let picks = select(&ctx(600.0, 50.0, VoltageTier::LowHighLoad, TrafficLight::Green));
        assert_eq!(
            picks,
            vec![
                (RecommendationKind::Solar, Priority::High),
                (RecommendationKind::EvCharging, Priority::Medium),
                (RecommendationKind::HeatPump, Priority::Medium),
            ]
        );
    }

    #[test]
    fn red_recommends_storage_first() {
        let picks = select(&ctx(0.0, 50.0, VoltageTier::Medium, TrafficLight::Red));
        assert_eq!(
            picks,
            vec![
                (RecommendationKind::Battery, Priority::High),
                (RecommendationKind::GridFriendly, Priority::High),
                (RecommendationKind::Community, Priority::Medium),
            ]
        );
    }

    #[test]
    fn medium_tier_green_adds_low_priority_community() {
        let picks = select(&ctx(15_500.0, 150.0, VoltageTier::Medium, TrafficLight::Green));
        assert!(picks.contains(&(RecommendationKind::Community, Priority::Low)));
        assert!(!kinds(&picks).contains(&RecommendationKind::HeatPump));
        assert!(!kinds(&picks).contains(&RecommendationKind::EvCharging));
    }

    #[test]
    fn green_without_headroom_recommends_nothing() {
        let picks = select(&ctx(60.0, 50.0, VoltageTier::LowHighLoad, TrafficLight::Green));
        assert!(picks.is_empty());
    }

    #[test]
    fn green_tight_headroom_earns_no_flexibility_bonus() {
        let c = ctx(180.0, 150.0, VoltageTier::Medium, TrafficLight::Green);
        let recs = recommend(&c, Locale::En);
        assert_eq!(
            recs.iter().map(|r| (r.kind, r.priority)).collect::<Vec<_>>(),
            vec![(RecommendationKind::Community, Priority::Low)]
        );
        // 1.2 / 2 * 70 = 42, no bonus
        assert_eq!(crate::engine::eco_score(c.capacity_ratio(), &recs), 42);
    }

    #[test]
    fn grid_friendly_only_below_green() {
        for light in [TrafficLight::Green, TrafficLight::Yellow, TrafficLight::Red] {
            let picks = select(&ctx(55.0, 50.0, VoltageTier::Medium, light));
            let has = kinds(&picks).contains(&RecommendationKind::GridFriendly);
            assert_eq!(has, light != TrafficLight::Green, "{light}");
        }
    }

    #[test]
    fn ratio_counts_small_requests_as_one_kw() {
        assert_eq!(capacity_ratio(10.0, 0.5), 10.0);
        assert_eq!(capacity_ratio(10.0, 5.0), 2.0);
    }

    #[test]
    fn selection_is_locale_independent() {
        let c = ctx(52.0, 50.0, VoltageTier::LowHighLoad, TrafficLight::Yellow);
        let en: Vec<_> = recommend(&c, Locale::En).iter().map(|r| (r.kind, r.priority)).collect();
        let de: Vec<_> = recommend(&c, Locale::De).iter().map(|r| (r.kind, r.priority)).collect();
        assert_eq!(en, de);
        assert_eq!(recommend(&c, Locale::De)[0].title, "Batteriespeicher installieren");
    }

    #[test]
    fn output_is_sorted_by_priority() {
        let picks = select(&ctx(200.0, 40.0, VoltageTier::LowHighLoad, TrafficLight::Yellow));
        assert!(picks.windows(2).all(|w| w[0].1 <= w[1].1));
    }
}
