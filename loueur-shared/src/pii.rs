use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Renter names, delivery addresses and other personal data.
///
/// `Debug` and `Display` print a fixed mask so the value never lands in a
/// `tracing` line by accident. Serialization carries the real value, since the
/// host needs it to confirm the booking.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Masked<T>(pub T);

const MASK: &str = "********";

impl<T> fmt::Debug for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(MASK)
    }
}

impl<T> fmt::Display for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(MASK)
    }
}

impl<T: Serialize> Serialize for Masked<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<T> Masked<T> {
    pub fn expose(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> From<T> for Masked<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masked_hides_value_in_formatting() {
        let renter = Masked("Awa Diop".to_string());

        assert_eq!(format!("{}", renter), "********");
        assert_eq!(format!("{:?}", renter), "********");
        assert_eq!(renter.expose(), "Awa Diop");
    }

    #[test]
    fn test_masked_serializes_real_value() {
        let address = Masked("12 route de Thiès".to_string());
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, "\"12 route de Thiès\"");

        let back: Masked<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, address);
    }
}
