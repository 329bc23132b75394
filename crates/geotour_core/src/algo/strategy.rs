use std::{fmt, str::FromStr};

use crate::{Error, algo::two_opt::TwoOptConfig};

const MIN_OPTIMIZABLE: usize = 4;
const AUTO_EXHAUSTIVE_BELOW: usize = 11;
const AUTO_TWO_OPT_MAX: usize = 750;
const AUTO_RESTRICTED_MAX: usize = 3_000;
const AUTO_SINGLE_PASS_MAX: usize = 10_000;

/// Tour optimization method, best quality first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Picked from the point count by [`Strategy::resolve`].
    #[default]
    Auto,
    Exhaustive,
    TwoOpt,
    RestrictedTwoOpt,
    SinglePassTwoOpt,
    MultiStartNearestNeighbor,
    NearestNeighbor,
    Identity,
}

impl Strategy {
    pub const ALL: [Strategy; 8] = [
        Strategy::Auto,
        Strategy::Exhaustive,
        Strategy::TwoOpt,
        Strategy::RestrictedTwoOpt,
        Strategy::SinglePassTwoOpt,
        Strategy::MultiStartNearestNeighbor,
        Strategy::NearestNeighbor,
        Strategy::Identity,
    ];

    /// Concrete strategy for `n` points. Fewer than four points are never
    /// optimized.
    pub fn resolve(self, n: usize) -> Strategy {
        if n < MIN_OPTIMIZABLE {
            return Strategy::Identity;
        }
        match self {
            Strategy::Auto if n < AUTO_EXHAUSTIVE_BELOW => Strategy::Exhaustive,
            Strategy::Auto if n <= AUTO_TWO_OPT_MAX => Strategy::TwoOpt,
            Strategy::Auto if n <= AUTO_RESTRICTED_MAX => Strategy::RestrictedTwoOpt,
            Strategy::Auto if n <= AUTO_SINGLE_PASS_MAX => Strategy::SinglePassTwoOpt,
            Strategy::Auto => Strategy::NearestNeighbor,
            explicit => explicit,
        }
    }

    /// 2-opt settings for the 2-opt family, `None` for the rest.
    pub fn two_opt_config(self, decay_rate: f64) -> Option<TwoOptConfig> {
        match self {
            Strategy::TwoOpt => Some(TwoOptConfig::full(decay_rate)),
            Strategy::RestrictedTwoOpt => Some(TwoOptConfig::restricted(decay_rate)),
            Strategy::SinglePassTwoOpt => Some(TwoOptConfig::single_pass()),
            _ => None,
        }
    }

    /// Whether the 2-opt run starts from a nearest-neighbor tour rather than
    /// the input order.
    pub fn seeds_with_nearest_neighbor(self) -> bool {
        matches!(
            self,
            Strategy::RestrictedTwoOpt | Strategy::SinglePassTwoOpt
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Auto => "auto",
            Strategy::Exhaustive => "exh",
            Strategy::TwoOpt => "opt",
            Strategy::RestrictedTwoOpt => "resOpt",
            Strategy::SinglePassTwoOpt => "bigOpt",
            Strategy::MultiStartNearestNeighbor => "nnMul",
            Strategy::NearestNeighbor => "nn",
            Strategy::Identity => "none",
        }
    }

    pub fn names() -> String {
        Self::ALL
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join("|")
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == s)
            .ok_or_else(|| {
                Error::invalid_input(format!(
                    "unknown method {s:?}; expected one of {}",
                    Self::names()
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::Strategy;

    #[test]
    fn auto_follows_threshold_table() {
        let cases = [
            (3, Strategy::Identity),
            (4, Strategy::Exhaustive),
            (10, Strategy::Exhaustive),
            (11, Strategy::TwoOpt),
            (750, Strategy::TwoOpt),
            (751, Strategy::RestrictedTwoOpt),
            (3_000, Strategy::RestrictedTwoOpt),
            (3_001, Strategy::SinglePassTwoOpt),
            (10_000, Strategy::SinglePassTwoOpt),
            (10_001, Strategy::NearestNeighbor),
        ];
        for (n, expected) in cases {
            assert_eq!(Strategy::Auto.resolve(n), expected, "n={n}");
        }
    }

    #[test]
    fn explicit_strategy_is_kept_unless_too_small() {
        assert_eq!(Strategy::TwoOpt.resolve(20_000), Strategy::TwoOpt);
        assert_eq!(Strategy::Exhaustive.resolve(15), Strategy::Exhaustive);
        assert_eq!(Strategy::NearestNeighbor.resolve(3), Strategy::Identity);
        assert_eq!(Strategy::Identity.resolve(100), Strategy::Identity);
    }

    #[test]
    fn parses_method_names() {
        for strategy in Strategy::ALL {
            let parsed: Strategy = strategy.as_str().parse().expect("known name");
            assert_eq!(parsed, strategy);
        }
        assert_eq!("resOpt".parse::<Strategy>().ok(), Some(Strategy::RestrictedTwoOpt));
        assert!("resopt".parse::<Strategy>().is_err());
        assert!("".parse::<Strategy>().is_err());
    }

    #[test]
    fn two_opt_configs_match_family() {
        let full = Strategy::TwoOpt.two_opt_config(0.7).expect("2-opt family");
        assert!(!full.restricted && full.annealing && full.pass_limit.is_none());
        assert_eq!(full.decay_rate, 0.7);

        let restricted = Strategy::RestrictedTwoOpt
            .two_opt_config(0.7)
            .expect("2-opt family");
        assert!(restricted.restricted && restricted.annealing);

        let single = Strategy::SinglePassTwoOpt
            .two_opt_config(0.7)
            .expect("2-opt family");
        assert_eq!(single.pass_limit, Some(1));
        assert!(!single.annealing);

        assert!(Strategy::NearestNeighbor.two_opt_config(0.7).is_none());
        assert!(Strategy::SinglePassTwoOpt.seeds_with_nearest_neighbor());
        assert!(!Strategy::TwoOpt.seeds_with_nearest_neighbor());
    }

    #[test]
    fn names_lists_every_method() {
        assert_eq!(Strategy::names(), "auto|exh|opt|resOpt|bigOpt|nnMul|nn|none");
    }
}
