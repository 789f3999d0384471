use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum BondOrder {
    Single = 1,
    Double = 2,
    Triple = 3,
    Aromatic = 4,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid bond order '{0}' (expected 1-4 or 'ar')")]
pub struct ParseBondOrderError(pub String);

impl BondOrder {
    pub fn from_order(order: u8) -> Option<Self> {
        match order {
            1 => Some(Self::Single),
            2 => Some(Self::Double),
            3 => Some(Self::Triple),
            4 => Some(Self::Aromatic),
            _ => None,
        }
    }
}

/// Parses the numeric order used by template tables and bond type keys; `ar` is accepted as
/// shorthand for aromatic.
impl FromStr for BondOrder {
    type Err = ParseBondOrderError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("ar") {
            return Ok(Self::Aromatic);
        }
        trimmed
            .parse::<u8>()
            .ok()
            .and_then(Self::from_order)
            .ok_or_else(|| ParseBondOrderError(s.to_string()))
    }
}

impl fmt::Display for BondOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u8)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bond {
    pub atom1: usize,     // Index of the first atom in the molecule
    pub atom2: usize,     // Index of the second atom in the molecule
    pub order: BondOrder, // Bond order (e.g., single, double, etc.)
}

impl Bond {
    pub fn new(atom1: usize, atom2: usize, order: BondOrder) -> Self {
        Self {
            atom1,
            atom2,
            order,
        }
    }

    /// Returns the bond with its atom indices in ascending order.
    pub fn canonical(&self) -> Self {
        Self::new(
            self.atom1.min(self.atom2),
            self.atom1.max(self.atom2),
            self.order,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bond_order_parses_numeric_orders_and_aromatic_shorthand() {
        assert_eq!("1".parse::<BondOrder>(), Ok(BondOrder::Single));
        assert_eq!(" 2 ".parse::<BondOrder>(), Ok(BondOrder::Double));
        assert_eq!("3".parse::<BondOrder>(), Ok(BondOrder::Triple));
        assert_eq!("4".parse::<BondOrder>(), Ok(BondOrder::Aromatic));
        assert_eq!("AR".parse::<BondOrder>(), Ok(BondOrder::Aromatic));
    }

    #[test]
    fn bond_order_rejects_anything_else() {
        assert!("".parse::<BondOrder>().is_err());
        assert!("single".parse::<BondOrder>().is_err());
        assert_eq!(
            "0".parse::<BondOrder>(),
            Err(ParseBondOrderError("0".to_string()))
        );
        assert_eq!(BondOrder::from_order(5), None);
    }

    #[test]
    fn bond_order_displays_as_its_number() {
        for order in ["1", "2", "3", "4"] {
            assert_eq!(order.parse::<BondOrder>().unwrap().to_string(), order);
        }
    }

    #[test]
    fn canonical_orders_indices() {
        let bond = Bond::new(7, 2, BondOrder::Double);
        assert_eq!(bond.canonical(), Bond::new(2, 7, BondOrder::Double));
        assert_eq!(bond.canonical().canonical(), bond.canonical());
    }
}
