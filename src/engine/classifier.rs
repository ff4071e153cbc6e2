//! Traffic-light verdict and its narrative.

use serde::Serialize;

use super::locale::{Locale, Localized, format_kw};
use super::types::{ConnectionType, TrafficLight, VoltageTier};

/// Margin a request must leave to be green without a detailed study.
pub const TIGHT_MARGIN_FACTOR: f64 = 1.10;
/// Loads above this on a low-voltage connection need a compatibility check (kW).
pub const COMPATIBILITY_CHECK_KW: f64 = 30.0;

/// Why a verdict came out the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictReason {
    /// Remaining capacity is below the request.
    InsufficientCapacity,
    /// A larger load on the low-voltage grid.
    CompatibilityCheck,
    /// Less than ten percent headroom.
    TightMargin,
    /// Enough headroom.
    Sufficient,
}

impl VerdictReason {
    /// Traffic light for this reason.
    pub fn traffic_light(self) -> TrafficLight {
        match self {
            Self::InsufficientCapacity => TrafficLight::Red,
            Self::CompatibilityCheck | Self::TightMargin => TrafficLight::Yellow,
            Self::Sufficient => TrafficLight::Green,
        }
    }
}

/// Classifies a request against the remaining capacity of its tier.
///
/// Rules apply in precedence order, so exactly one reason is returned for
/// every input.
pub fn classify(
    remaining_kw: f64,
    kw_requested: f64,
    tier: VoltageTier,
    connection_type: ConnectionType,
) -> VerdictReason {
    if remaining_kw < kw_requested {
        VerdictReason::InsufficientCapacity
    } else if tier.is_low()
        && connection_type == ConnectionType::Load
        && kw_requested > COMPATIBILITY_CHECK_KW
    {
        VerdictReason::CompatibilityCheck
    } else if remaining_kw < kw_requested * TIGHT_MARGIN_FACTOR {
        VerdictReason::TightMargin
    } else {
        VerdictReason::Sufficient
    }
}

/// Applicant-facing text for a verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Narrative {
    /// Headline.
    pub message: String,
    /// Expected processing time.
    pub timeline: String,
    /// Next action for the applicant.
    pub next_steps: String,
    /// Connection kind implied by the tier.
    pub connection_note: String,
}

struct VerdictText {
    message: Localized,
    timeline: Localized,
    next_steps: Localized,
}

const INSUFFICIENT: VerdictText = VerdictText {
    message: Localized {
        en: "Grid expansion required. {requested} kW requested, {remaining} kW available.",
        de: "Netzerweiterung erforderlich. {requested} kW angefragt, {remaining} kW verfügbar.",
    },
    timeline: Localized {
        en: "6-12+ months",
        de: "6-12+ Monate",
    },
    next_steps: Localized {
        en: "Contact Grid Planning for expansion assessment.",
        de: "Kontaktieren Sie die Netzplanung für Erweiterungsbewertung.",
    },
};

const COMPATIBILITY: VerdictText = VerdictText {
    message: Localized {
        en: "Connection possible after review. Loads above 30 kW on the low-voltage grid need a compatibility check.",
        de: "Anschluss nach Prüfung möglich. Lasten über 30 kW im Niederspannungsnetz erfordern eine Netzverträglichkeitsprüfung.",
    },
    timeline: Localized {
        en: "1-3 months",
        de: "1-3 Monate",
    },
    next_steps: Localized {
        en: "Submit a grid compatibility check with your application.",
        de: "Reichen Sie mit Ihrem Antrag eine Netzverträglichkeitsprüfung ein.",
    },
};

const TIGHT: VerdictText = VerdictText {
    message: Localized {
        en: "Connection possible but capacity is tight. {remaining} kW available for {requested} kW requested.",
        de: "Anschluss möglich, aber die Kapazität ist knapp. {remaining} kW verfügbar bei {requested} kW angefragt.",
    },
    timeline: Localized {
        en: "1-3 months",
        de: "1-3 Monate",
    },
    next_steps: Localized {
        en: "Request a detailed grid impact study.",
        de: "Beantragen Sie eine detaillierte Netzwirkungsstudie.",
    },
};

const SUFFICIENT: VerdictText = VerdictText {
    message: Localized {
        en: "Connection feasible. Sufficient capacity available.",
        de: "Anschluss machbar. Ausreichende Kapazität verfügbar.",
    },
    timeline: Localized {
        en: "2-4 weeks",
        de: "2-4 Wochen",
    },
    next_steps: Localized {
        en: "Submit standard connection application online.",
        de: "Standard-Anschlussantrag online einreichen.",
    },
};

fn verdict_text(reason: VerdictReason) -> &'static VerdictText {
    match reason {
        VerdictReason::InsufficientCapacity => &INSUFFICIENT,
        VerdictReason::CompatibilityCheck => &COMPATIBILITY,
        VerdictReason::TightMargin => &TIGHT,
        VerdictReason::Sufficient => &SUFFICIENT,
    }
}

/// Display name of a tier.
pub fn tier_label(tier: VoltageTier) -> Localized {
    match tier {
        VoltageTier::LowStandard => Localized {
            en: "Low Voltage (Standard)",
            de: "Niederspannung (Standard)",
        },
        VoltageTier::LowHighLoad => Localized {
            en: "Low Voltage (High Load)",
            de: "Niederspannung (Hohe Last)",
        },
        VoltageTier::Medium => Localized {
            en: "Medium Voltage",
            de: "Mittelspannung",
        },
        VoltageTier::High => Localized {
            en: "High Voltage",
            de: "Hochspannung",
        },
    }
}

fn connection_note(tier: VoltageTier) -> Localized {
    match tier {
        VoltageTier::LowStandard => Localized {
            en: "House connection / low-voltage grid. Standard registration through a registered installer.",
            de: "Hausanschluss / Niederspannungsnetz. Standardanmeldung über Installateurverzeichnis.",
        },
        VoltageTier::LowHighLoad => Localized {
            en: "Reinforced house connection / low-voltage grid. Registration through a registered installer with load details.",
            de: "Verstärkter Hausanschluss / Niederspannungsnetz. Anmeldung über Installateurverzeichnis mit Lastangaben.",
        },
        VoltageTier::Medium => Localized {
            en: "Customer substation on the medium-voltage grid. Medium-voltage connection request and transformer station planning required.",
            de: "Kundenstation am Mittelspannungsnetz. Anfrage für Mittelspannungsanschluss erforderlich. Planung einer Trafostation.",
        },
        VoltageTier::High => Localized {
            en: "Primary substation / high-voltage grid. Individual grid study required, please contact the grid operator directly.",
            de: "Umspannwerk / Hochspannungsnetz. Individuelle Netzstudie erforderlich. Bitte kontaktieren Sie den Netzbetreiber direkt.",
        },
    }
}

/// Renders the narrative for a verdict in `locale`.
pub fn narrate(
    reason: VerdictReason,
    tier: VoltageTier,
    remaining_kw: f64,
    kw_requested: f64,
    locale: Locale,
) -> Narrative {
    let text = verdict_text(reason);
    let args = [
        ("requested", format_kw(kw_requested, locale)),
        ("remaining", format_kw(remaining_kw, locale)),
    ];
    Narrative {
        message: text.message.render(locale, &args),
        timeline: text.timeline.get(locale).to_string(),
        next_steps: text.next_steps.get(locale).to_string(),
        connection_note: format!(
            "{}: {}",
            tier_label(tier).get(locale),
            connection_note(tier).get(locale)
        ),
    }
}
