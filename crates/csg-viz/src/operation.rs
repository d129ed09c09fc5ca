use std::fmt;
use std::str::FromStr;

use bsp_csg::Csg;
use thiserror::Error;

/// The boolean operations a viewer can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Union,
    Subtract,
    Intersect,
    /// Inverse of the first operand; the second is ignored.
    Inverse,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown operation '{0}', expected union, subtract, intersect or inverse")]
pub struct UnknownOperation(pub String);

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Union,
        Operation::Subtract,
        Operation::Intersect,
        Operation::Inverse,
    ];

    pub fn apply<S: Clone>(self, a: &Csg<S>, b: &Csg<S>) -> Csg<S> {
        match self {
            Operation::Union => a.union(b),
            Operation::Subtract => a.subtract(b),
            Operation::Intersect => a.intersect(b),
            Operation::Inverse => a.inverse(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Operation::Union => "union",
            Operation::Subtract => "subtract",
            Operation::Intersect => "intersect",
            Operation::Inverse => "inverse",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = UnknownOperation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownOperation(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bsp_csg::Point;

    #[test]
    fn parse_names() {
        for op in Operation::ALL {
            assert_eq!(op.to_string().parse::<Operation>(), Ok(op));
        }
        assert_eq!("UNION".parse::<Operation>(), Ok(Operation::Union));
        assert_eq!("xor".parse::<Operation>(), Err(UnknownOperation("xor".into())));
    }

    #[test]
    fn apply_matches_direct_calls() {
        let a = Csg::cube(Point::origin(), 1.0, ());
        let b = Csg::cube(Point::new(0.5, 0.5, 0.5), 1.0, ());

        let volumes: Vec<f64> = Operation::ALL.iter().map(|op| op.apply(&a, &b).volume()).collect();
        let expected = [1.875, 0.875, 0.125, -1.0];
        for (got, want) in volumes.iter().zip(expected) {
            assert!((got - want).abs() < 1e-9, "{got} != {want}");
        }
    }
}
