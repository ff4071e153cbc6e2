//! Scripted applicant briefing built from a finished evaluation.

use std::fmt;

use serde::Serialize;

use super::classifier::tier_label;
use super::locale::{Localized, format_kw};
use super::types::{FeasibilityResult, TrafficLight};

/// Greeting, connection details, and fallback options for one result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Briefing {
    /// Opening line, tuned to the verdict.
    pub greeting: String,
    /// Key facts about the proposed connection.
    pub details: Vec<String>,
    /// Alternatives, empty for green results.
    pub alternatives: Vec<String>,
    /// Closing prompt.
    pub closing: String,
}

const GREETING_GREEN: Localized = Localized {
    en: "Great news! Your grid connection for {kw} kW is feasible. The capacity is available and your application can be processed quickly.",
    de: "Gute Nachrichten! Ihr Netzanschluss für {kw} kW ist machbar. Die Kapazität ist verfügbar und Ihr Antrag kann schnell bearbeitet werden.",
};

const GREETING_YELLOW: Localized = Localized {
    en: "Your request for {kw} kW requires a detailed review. The grid has limited capacity. Expected timeline: {timeline}.",
    de: "Ihre Anfrage für {kw} kW erfordert eine detaillierte Prüfung. Das Netz hat begrenzte Kapazität. Voraussichtliche Zeitachse: {timeline}.",
};

const GREETING_RED: Localized = Localized {
    en: "Unfortunately, the grid does not have sufficient capacity for {kw} kW. Grid expansion would be needed, which typically takes {timeline}.",
    de: "Leider hat das Netz keine ausreichende Kapazität für {kw} kW. Eine Netzerweiterung wäre erforderlich, die normalerweise {timeline} dauert.",
};

const DETAIL_STATION: Localized = Localized {
    en: "Nearest station: {station} ({distance} m away)",
    de: "Nächste Station: {station} ({distance} m entfernt)",
};

const DETAIL_TIER: Localized = Localized {
    en: "Voltage level: {tier}",
    de: "Spannungsebene: {tier}",
};

const DETAIL_ESCALATED: Localized = Localized {
    en: "The local station is saturated, so the request was checked against substation {upstream}.",
    de: "Die lokale Station ist ausgelastet, daher wurde die Anfrage gegen Umspannwerk {upstream} geprüft.",
};

const DETAIL_CAPACITY: Localized = Localized {
    en: "Available capacity: {remaining} kW",
    de: "Verfügbare Kapazität: {remaining} kW",
};

const DETAIL_NEXT: Localized = Localized {
    en: "Next step: {next}",
    de: "Nächster Schritt: {next}",
};

const ALTERNATIVES: [Localized; 4] = [
    Localized {
        en: "Reduce power: scale down the installation to fit the available capacity.",
        de: "Leistung reduzieren: Anlage so verkleinern, dass sie in die verfügbare Kapazität passt.",
    },
    Localized {
        en: "Different location: check nearby addresses with better grid capacity.",
        de: "Anderer Standort: Adressen in der Nähe mit besserer Netzkapazität prüfen.",
    },
    Localized {
        en: "Phased installation: start with partial capacity now and expand later.",
        de: "Stufenweise Installation: jetzt mit einem Teil der Leistung starten und später erweitern.",
    },
    Localized {
        en: "Grid expansion: apply for connection and participate in grid upgrade costs.",
        de: "Netzausbau: Anschluss beantragen und sich an den Ausbaukosten beteiligen.",
    },
];

const CLOSING_GREEN: Localized = Localized {
    en: "You can submit your application right away.",
    de: "Sie können Ihren Antrag direkt einreichen.",
};

const CLOSING_REVIEW: Localized = Localized {
    en: "Submit an application so the grid team can evaluate these options with you.",
    de: "Reichen Sie einen Antrag ein, damit das Netzteam diese Optionen mit Ihnen bewerten kann.",
};

/// Builds the briefing in the result's own locale.
pub fn brief(result: &FeasibilityResult) -> Briefing {
    let locale = result.locale;
    let kw = format_kw(result.kw_requested, locale);
    let timeline = result.timeline.clone();

    let greeting = match result.traffic_light {
        TrafficLight::Green => GREETING_GREEN,
        TrafficLight::Yellow => GREETING_YELLOW,
        TrafficLight::Red => GREETING_RED,
    }
    .render(locale, &[("kw", kw), ("timeline", timeline)]);

    let mut details = vec![
        DETAIL_STATION.render(
            locale,
            &[
                ("station", result.local_facility_id.clone()),
                ("distance", format!("{:.0}", result.distance_m)),
            ],
        ),
        DETAIL_TIER.render(locale, &[("tier", tier_label(result.tier).get(locale).to_string())]),
    ];
    if result.escalated {
        details.push(DETAIL_ESCALATED.render(
            locale,
            &[("upstream", result.capacity.facility_id.clone())],
        ));
    }
    details.push(DETAIL_CAPACITY.render(
        locale,
        &[("remaining", format_kw(result.capacity.remaining_safe_kw, locale))],
    ));
    details.push(DETAIL_NEXT.render(locale, &[("next", result.next_steps.clone())]));

    let (alternatives, closing) = match result.traffic_light {
        TrafficLight::Green => (Vec::new(), CLOSING_GREEN),
        TrafficLight::Yellow | TrafficLight::Red => (
            ALTERNATIVES.iter().map(|a| a.get(locale).to_string()).collect(),
            CLOSING_REVIEW,
        ),
    };

    Briefing {
        greeting,
        details,
        alternatives,
        closing: closing.get(locale).to_string(),
    }
}

impl fmt::Display for Briefing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.greeting)?;
        writeln!(f)?;
        for line in &self.details {
            writeln!(f, "- {line}")?;
        }
        if !self.alternatives.is_empty() {
            writeln!(f)?;
            for (i, alt) in self.alternatives.iter().enumerate() {
                writeln!(f, "{}. {alt}", i + 1)?;
            }
        }
        writeln!(f)?;
        write!(f, "{}", self.closing)
    }
}
