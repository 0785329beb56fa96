use serde::Serialize;

/// A priced feature bundle offered on the preview screen. Read-only catalog data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub id: &'static str,
    pub name: &'static str,
    /// One-time price in whole dollars.
    pub price: u32,
    pub features: &'static [&'static str],
    pub recommended: bool,
}

pub const PLANS: &[Plan] = &[
    Plan {
        id: "basic",
        name: "Single Resume",
        price: 15,
        features: &[
            "AI-Optimized Resume",
            "1 Professional Template",
            "ATS Score Analysis",
            "PDF Download",
            "Lifetime Access",
        ],
        recommended: false,
    },
    Plan {
        id: "pro",
        name: "Career Bundle",
        price: 25,
        features: &[
            "AI-Optimized Resume",
            "Custom Cover Letter",
            "LinkedIn Profile Optimizer",
            "5 Premium Templates",
            "ATS Score Analysis",
            "Achievement Quantifier",
            "PDF Download",
            "Lifetime Access",
        ],
        recommended: true,
    },
];

pub fn find_plan(id: &str) -> Option<&'static Plan> {
    PLANS.iter().find(|p| p.id == id)
}
