/// One of the four independent properties printed on every card.
///
/// Each attribute takes one of three values, so a card is a point in a
/// 4-dimensional grid of side 3. The discriminant is the base-3 digit
/// position of the attribute inside the card byte.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Attribute {
    Count = 0,
    Color = 1,
    Shade = 2,
    Shape = 3,
}

impl Attribute {
    pub const ALL: [Self; crate::FEATURES] = [
        Attribute::Count,
        Attribute::Color,
        Attribute::Shade,
        Attribute::Shape,
    ];
    /// Place value of this attribute's digit (3^position).
    pub const fn weight(&self) -> u8 {
        match self {
            Attribute::Count => 1,
            Attribute::Color => 3,
            Attribute::Shade => 9,
            Attribute::Shape => 27,
        }
    }
    /// Single-letter label for a value of this attribute.
    pub fn label(&self, value: u8) -> char {
        let labels = match self {
            Attribute::Count => ['1', '2', '3'],
            Attribute::Color => ['R', 'G', 'P'],
            Attribute::Shade => ['S', 'T', 'O'],
            Attribute::Shape => ['D', 'W', 'V'],
        };
        labels[value as usize % crate::VALUES]
    }
}

impl From<u8> for Attribute {
    fn from(n: u8) -> Attribute {
        match n {
            0 => Attribute::Count,
            1 => Attribute::Color,
            2 => Attribute::Shade,
            3 => Attribute::Shape,
            _ => panic!("Invalid attribute"),
        }
    }
}
impl From<Attribute> for u8 {
    fn from(a: Attribute) -> u8 {
        a as u8
    }
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Attribute::Count => "count",
                Attribute::Color => "color",
                Attribute::Shade => "shade",
                Attribute::Shape => "shape",
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_are_powers_of_three() {
        for attribute in Attribute::ALL {
            let position = u8::from(attribute) as u32;
            assert_eq!(attribute.weight() as u32, 3u32.pow(position));
        }
    }

    #[test]
    fn bijective_u8() {
        for attribute in Attribute::ALL {
            assert_eq!(attribute, Attribute::from(u8::from(attribute)));
        }
    }
}
