use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// Number of goals in the catalog.
pub const GOAL_COUNT: u8 = 17;

/// A goal number in `1..=17`. Cannot be constructed out of range.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(try_from = "i64", into = "u8")]
#[ts(export)]
pub struct GoalNumber(u8);

impl GoalNumber {
    pub fn new(number: i64) -> Result<Self, CoreError> {
        if (1..=GOAL_COUNT as i64).contains(&number) {
            Ok(Self(number as u8))
        } else {
            Err(CoreError::InvalidGoalNumber(number))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// All goal numbers in ascending order.
    pub fn all() -> impl Iterator<Item = GoalNumber> {
        (1..=GOAL_COUNT).map(GoalNumber)
    }
}

impl TryFrom<i64> for GoalNumber {
    type Error = CoreError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<GoalNumber> for u8 {
    fn from(number: GoalNumber) -> Self {
        number.0
    }
}

impl fmt::Display for GoalNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One of the 17 UN Sustainable Development Goals.
///
/// Reference data: built from a compile-time table, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Goal {
    pub number: GoalNumber,
    pub name: String,
    pub description: String,
    pub color_code: String,
}

struct GoalEntry {
    name: &'static str,
    description: &'static str,
    color_code: &'static str,
}

// Indexed by `number - 1`.
const CATALOG: [GoalEntry; GOAL_COUNT as usize] = [
    GoalEntry {
        name: "No Poverty",
        description: "End poverty in all its forms everywhere.",
        color_code: "#E5243B",
    },
    GoalEntry {
        name: "Zero Hunger",
        description: "End hunger, achieve food security and improved nutrition and promote sustainable agriculture.",
        color_code: "#DDA63A",
    },
    GoalEntry {
        name: "Good Health and Well-being",
        description: "Ensure healthy lives and promote well-being for all at all ages.",
        color_code: "#4C9F38",
    },
    GoalEntry {
        name: "Quality Education",
        description: "Ensure inclusive and equitable quality education and promote lifelong learning opportunities for all.",
        color_code: "#C5192D",
    },
    GoalEntry {
        name: "Gender Equality",
        description: "Achieve gender equality and empower all women and girls.",
        color_code: "#FF3A21",
    },
    GoalEntry {
        name: "Clean Water and Sanitation",
        description: "Ensure availability and sustainable management of water and sanitation for all.",
        color_code: "#26BDE2",
    },
    GoalEntry {
        name: "Affordable and Clean Energy",
        description: "Ensure access to affordable, reliable, sustainable and modern energy for all.",
        color_code: "#FCC30B",
    },
    GoalEntry {
        name: "Decent Work and Economic Growth",
        description: "Promote sustained, inclusive and sustainable economic growth, full and productive employment and decent work for all.",
        color_code: "#A21942",
    },
    GoalEntry {
        name: "Industry, Innovation and Infrastructure",
        description: "Build resilient infrastructure, promote inclusive and sustainable industrialization and foster innovation.",
        color_code: "#FD6925",
    },
    GoalEntry {
        name: "Reduced Inequality",
        description: "Reduce inequality within and among countries.",
        color_code: "#DD1367",
    },
    GoalEntry {
        name: "Sustainable Cities and Communities",
        description: "Make cities and human settlements inclusive, safe, resilient and sustainable.",
        color_code: "#FD9D24",
    },
    GoalEntry {
        name: "Responsible Consumption and Production",
        description: "Ensure sustainable consumption and production patterns.",
        color_code: "#BF8B2E",
    },
    GoalEntry {
        name: "Climate Action",
        description: "Take urgent action to combat climate change and its impacts.",
        color_code: "#3F7E44",
    },
    GoalEntry {
        name: "Life Below Water",
        description: "Conserve and sustainably use the oceans, seas and marine resources for sustainable development.",
        color_code: "#0A97D9",
    },
    GoalEntry {
        name: "Life on Land",
        description: "Protect, restore and promote sustainable use of terrestrial ecosystems, sustainably manage forests, combat desertification, and halt and reverse land degradation and biodiversity loss.",
        color_code: "#56C02B",
    },
    GoalEntry {
        name: "Peace, Justice and Strong Institutions",
        description: "Promote peaceful and inclusive societies for sustainable development, provide access to justice for all and build effective, accountable and inclusive institutions at all levels.",
        color_code: "#00689D",
    },
    GoalEntry {
        name: "Partnerships for the Goals",
        description: "Strengthen the means of implementation and revitalize the Global Partnership for Sustainable Development.",
        color_code: "#19486A",
    },
];

/// Look up a goal by number.
pub fn goal(number: GoalNumber) -> Goal {
    let entry = &CATALOG[(number.get() - 1) as usize];
    Goal {
        number,
        name: entry.name.to_string(),
        description: entry.description.to_string(),
        color_code: entry.color_code.to_string(),
    }
}

/// The full catalog, ordered by goal number.
pub fn catalog() -> Vec<Goal> {
    GoalNumber::all().map(goal).collect()
}
