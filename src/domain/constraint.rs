//! Relational constraints on versions (`>=5`, `!=1.2.3`, ...)

use super::Version;
use std::fmt;

/// A relational operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// `>=`
    GreaterOrEqual,
    /// `<=`
    LessOrEqual,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
}

impl Relation {
    /// All relations, two-character operators first so `<` never shadows `<=`
    pub const ALL: [Relation; 6] = [
        Relation::GreaterOrEqual,
        Relation::LessOrEqual,
        Relation::Equal,
        Relation::NotEqual,
        Relation::Less,
        Relation::Greater,
    ];

    /// The textual operator
    pub fn symbol(&self) -> &'static str {
        match self {
            Relation::GreaterOrEqual => ">=",
            Relation::LessOrEqual => "<=",
            Relation::Less => "<",
            Relation::Greater => ">",
            Relation::Equal => "==",
            Relation::NotEqual => "!=",
        }
    }

    /// Looks up the relation for an exact operator string
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.symbol() == symbol)
    }

    /// Splits a leading operator off `text`, longest match first
    pub fn strip_prefix(text: &str) -> Option<(Self, &str)> {
        Self::ALL
            .into_iter()
            .find_map(|r| text.strip_prefix(r.symbol()).map(|rest| (r, rest)))
    }

    /// Evaluates `candidate <relation> target`
    pub fn holds(&self, candidate: &Version, target: &Version) -> bool {
        match self {
            Relation::GreaterOrEqual => candidate.is_greater_or_equal(target),
            Relation::LessOrEqual => candidate.is_less_or_equal(target),
            Relation::Less => candidate.is_less(target),
            Relation::Greater => candidate.is_greater(target),
            Relation::Equal => candidate.matches(target),
            Relation::NotEqual => !candidate.matches(target),
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A relation bound to a target version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionConstraint {
    pub relation: Relation,
    pub version: Version,
}

impl VersionConstraint {
    pub fn new(relation: Relation, version: Version) -> Self {
        Self { relation, version }
    }

    /// Returns true if `candidate` satisfies this constraint
    pub fn test(&self, candidate: &Version) -> bool {
        self.relation.holds(candidate, &self.version)
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.relation, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(number: &[u64]) -> Version {
        Version::new(number.to_vec(), None).unwrap()
    }

    #[test]
    fn test_symbol_round_trip() {
        for relation in Relation::ALL {
            assert_eq!(Relation::from_symbol(relation.symbol()), Some(relation));
        }
        assert_eq!(Relation::from_symbol("="), None);
        assert_eq!(Relation::from_symbol("~"), None);
    }

    #[test]
    fn test_strip_prefix_longest_match() {
        assert_eq!(
            Relation::strip_prefix("<=1.0"),
            Some((Relation::LessOrEqual, "1.0"))
        );
        assert_eq!(Relation::strip_prefix("<1.0"), Some((Relation::Less, "1.0")));
        assert_eq!(
            Relation::strip_prefix(">=2"),
            Some((Relation::GreaterOrEqual, "2"))
        );
        assert_eq!(Relation::strip_prefix(">2"), Some((Relation::Greater, "2")));
        assert_eq!(Relation::strip_prefix("1.0"), None);
    }

    #[test]
    fn test_constraint_each_relation() {
        let target = v(&[5, 0]);
        let cases = [
            (Relation::GreaterOrEqual, [false, true, true]),
            (Relation::LessOrEqual, [true, true, false]),
            (Relation::Less, [true, false, false]),
            (Relation::Greater, [false, false, true]),
            (Relation::Equal, [false, true, false]),
            (Relation::NotEqual, [true, false, true]),
        ];
        let candidates = [v(&[4, 9]), v(&[5, 0]), v(&[5, 1])];
        for (relation, expected) in cases {
            let constraint = VersionConstraint::new(relation, target.clone());
            for (candidate, want) in candidates.iter().zip(expected) {
                assert_eq!(
                    constraint.test(candidate),
                    want,
                    "{} {}",
                    candidate,
                    constraint
                );
            }
        }
    }

    #[test]
    fn test_constraint_against_shorter_target() {
        // `>=5` accepts 5.1.0 and rejects 4.0.0
        let constraint = VersionConstraint::new(Relation::GreaterOrEqual, v(&[5]));
        assert!(constraint.test(&v(&[5, 1, 0])));
        assert!(!constraint.test(&v(&[4, 0, 0])));
    }

    #[test]
    fn test_display() {
        let constraint = VersionConstraint::new(Relation::NotEqual, v(&[1, 2, 3]));
        assert_eq!(constraint.to_string(), "!=1.2.3");
    }
}
