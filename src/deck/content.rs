use strum::{Display, EnumIter};

/// The sections that make up the pitch, in presentation order.
#[derive(Clone, Copy, Debug, Display, EnumIter, PartialEq, Eq)]
pub(crate) enum PitchSection {
    #[strum(serialize = "Termforge")]
    Title,
    Problem,
    Solution,
    Product,
    Market,
    #[strum(serialize = "Business model")]
    BusinessModel,
    Traction,
    Competition,
    Team,
    #[strum(serialize = "The ask")]
    Ask,
}

pub(crate) const COMPANY: &str = "Termforge";
pub(crate) const TAGLINE: &str = "The collaborative workspace that lives in the terminal";
pub(crate) const ROUND_DATE: &str = "March 2026";

/// A headline plus its supporting bullet points.
pub(crate) struct SectionCopy {
    pub(crate) headline: &'static str,
    pub(crate) bullets: &'static [&'static str],
}

pub(crate) const PROBLEM: SectionCopy = SectionCopy {
    headline: "Developer tooling is scattered across a dozen browser tabs",
    bullets: &[
        "Engineers context switch between terminal, dashboards and chat all day",
        "CLI tooling is powerful but invisible: no shared state, no collaboration",
        "Every team rebuilds the same internal scripts from scratch",
    ],
};

pub(crate) const SOLUTION: SectionCopy = SectionCopy {
    headline: "Meet developers where they already work",
    bullets: &[
        "Terminal native workspaces with shared sessions and replayable history",
        "One keystroke publishes a local script as a team wide command",
        "Works over plain SSH, nothing to install on the server side",
    ],
};

pub(crate) const PRODUCT: SectionCopy = SectionCopy {
    headline: "Three commands, one workflow",
    bullets: &[
        "forge run: sandboxed execution of any team command",
        "forge share: live terminal sessions with role based access",
        "forge hub: a searchable registry of every internal tool",
    ],
};

pub(crate) const MARKET_HEADLINE: &str = "Developer tooling spend is compounding";

/// One year of market figures, sized in billions of dollars and millions of
/// professional developers respectively.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct MarketDataPoint {
    pub(crate) label: &'static str,
    pub(crate) market_size_billions: f64,
    pub(crate) developers_millions: f64,
}

pub(crate) const MARKET_DATA: [MarketDataPoint; 7] = [
    MarketDataPoint { label: "2019", market_size_billions: 4.9, developers_millions: 18.9 },
    MarketDataPoint { label: "2020", market_size_billions: 5.8, developers_millions: 20.3 },
    MarketDataPoint { label: "2021", market_size_billions: 7.1, developers_millions: 21.9 },
    MarketDataPoint { label: "2022", market_size_billions: 8.9, developers_millions: 23.5 },
    MarketDataPoint { label: "2023", market_size_billions: 11.2, developers_millions: 25.6 },
    MarketDataPoint { label: "2024", market_size_billions: 14.0, developers_millions: 27.7 },
    MarketDataPoint { label: "2025", market_size_billions: 17.6, developers_millions: 30.0 },
];

pub(crate) const BUSINESS_MODEL_HEADLINE: &str = "Bottom up adoption, top down expansion";

pub(crate) const PRICING_TIERS: &[(&str, &str)] = &[
    ("Free", "individual use, unlimited local commands"),
    ("Team, $12 per seat", "shared registry, session recording, usage insights"),
    ("Enterprise", "SSO, audit log, self hosted relay"),
];

pub(crate) const TRACTION_HEADLINE: &str = "Fourteen months since launch";

pub(crate) const TRACTION_METRICS: &[(&str, &str)] = &[
    ("Weekly active developers", "11,400"),
    ("Paying teams", "310"),
    ("Annual recurring revenue", "$1.8M"),
    ("Net revenue retention", "134%"),
];

pub(crate) const COMPETITION_HEADLINE: &str = "Everyone else asks developers to leave the terminal";

pub(crate) const COMPETITORS: &[(&str, &str)] = &[
    ("Modern terminal emulators", "single player, no shared registry"),
    ("Desktop launchers", "not available over SSH"),
    ("Internal developer portals", "heavyweight, take weeks to deploy"),
];

pub(crate) const POSITIONING: &str = "Termforge makes the terminal teams already use collaborative.";

pub(crate) const TEAM_HEADLINE: &str = "Built by people who lived the problem";

pub(crate) struct TeamMember {
    pub(crate) name: &'static str,
    pub(crate) role: &'static str,
    pub(crate) background: &'static str,
}

pub(crate) const TEAM: &[TeamMember] = &[
    TeamMember { name: "Elena Marchetti", role: "CEO", background: "led developer platform at a cloud infra unicorn" },
    TeamMember { name: "Priya Raghavan", role: "CTO", background: "staff engineer, developer infrastructure" },
    TeamMember { name: "Jonas Weber", role: "Founding engineer", background: "early engineer at a devtools startup" },
];

pub(crate) const ASK: SectionCopy = SectionCopy {
    headline: "Raising an $8M Series A",
    bullets: &[
        "Grow engineering from six to fourteen",
        "Ship the enterprise relay and compliance features",
        "Eighteen months of runway to $5M ARR",
    ],
};

#[cfg(test)]
mod test {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn section_order() {
        let sections: Vec<_> = PitchSection::iter().collect();
        assert_eq!(sections.len(), 10);
        assert_eq!(sections.first(), Some(&PitchSection::Title));
        assert_eq!(sections.last(), Some(&PitchSection::Ask));
    }

    #[test]
    fn section_titles() {
        assert_eq!(PitchSection::Title.to_string(), COMPANY);
        assert_eq!(PitchSection::BusinessModel.to_string(), "Business model");
        assert_eq!(PitchSection::Ask.to_string(), "The ask");
    }

    #[test]
    fn market_data_grows() {
        for window in MARKET_DATA.windows(2) {
            assert!(window[1].market_size_billions > window[0].market_size_billions, "market size dipped");
            assert!(window[1].developers_millions > window[0].developers_millions, "developer count dipped");
        }
    }

    #[test]
    fn market_data_labels_are_consecutive_years() {
        let years: Vec<i32> = MARKET_DATA.iter().map(|point| point.label.parse().expect("not a year")).collect();
        for window in years.windows(2) {
            assert_eq!(window[1], window[0] + 1);
        }
    }
}
