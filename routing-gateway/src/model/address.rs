//! Postal addresses for geocoding requests.

use std::fmt;

/// Error returned when building an address from invalid parts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid address: {reason}")]
pub struct InvalidAddress {
    reason: &'static str,
}

impl InvalidAddress {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A German-format postal address.
///
/// Values are validated by [`AddressBuilder`], so any `Address` has a
/// non-empty street, house number and city, and a postal code that fits the
/// five-digit German scheme (0 to 99999, rendered zero-padded).
///
/// # Examples
///
/// ```
/// use routing_gateway::model::Address;
///
/// let address = Address::builder()
///     .street("Straße des 17. Juni")
///     .house_number("135")
///     .city("Berlin")
///     .postal_code(10623)
///     .build()
///     .unwrap();
///
/// assert_eq!(address.postal_code_string(), "10623");
///
/// // Postal codes above 99999 are rejected
/// assert!(
///     Address::builder()
///         .street("Unter den Linden")
///         .house_number("1")
///         .city("Berlin")
///         .postal_code(100_000)
///         .build()
///         .is_err()
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address {
    street: String,
    house_number: String,
    city: String,
    postal_code: u32,
}

impl Address {
    /// Start building an address.
    pub fn builder() -> AddressBuilder {
        AddressBuilder::default()
    }

    /// Street name without the house number.
    pub fn street(&self) -> &str {
        &self.street
    }

    /// House number, kept as a string to allow suffixes like "12a".
    pub fn house_number(&self) -> &str {
        &self.house_number
    }

    /// City name.
    pub fn city(&self) -> &str {
        &self.city
    }

    /// Postal code as a number in [0, 99999].
    pub fn postal_code(&self) -> u32 {
        self.postal_code
    }

    /// Postal code in the zero-padded five-digit form providers expect.
    pub fn postal_code_string(&self) -> String {
        format!("{:05}", self.postal_code)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}, {} {}",
            self.street,
            self.house_number,
            self.postal_code_string(),
            self.city
        )
    }
}

/// Builder for [`Address`], validating on [`build`](AddressBuilder::build).
#[derive(Debug, Clone, Default)]
pub struct AddressBuilder {
    street: Option<String>,
    house_number: Option<String>,
    city: Option<String>,
    postal_code: Option<u32>,
}

impl AddressBuilder {
    /// Set the street name.
    pub fn street(mut self, street: impl Into<String>) -> Self {
        self.street = Some(street.into());
        self
    }

    /// Set the house number.
    pub fn house_number(mut self, house_number: impl Into<String>) -> Self {
        self.house_number = Some(house_number.into());
        self
    }

    /// Set the city name.
    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    /// Set the postal code. Must be at most 99999.
    pub fn postal_code(mut self, postal_code: u32) -> Self {
        self.postal_code = Some(postal_code);
        self
    }

    /// Validate the parts and build the address.
    pub fn build(self) -> Result<Address, InvalidAddress> {
        let street = self
            .street
            .ok_or_else(|| InvalidAddress::new("street is required"))?;
        if street.trim().is_empty() {
            return Err(InvalidAddress::new("street must not be empty"));
        }

        let house_number = self
            .house_number
            .ok_or_else(|| InvalidAddress::new("house number is required"))?;
        if house_number.trim().is_empty() {
            return Err(InvalidAddress::new("house number must not be empty"));
        }

        let city = self
            .city
            .ok_or_else(|| InvalidAddress::new("city is required"))?;
        if city.trim().is_empty() {
            return Err(InvalidAddress::new("city must not be empty"));
        }

        let postal_code = self
            .postal_code
            .ok_or_else(|| InvalidAddress::new("postal code is required"))?;
        if postal_code > 99_999 {
            return Err(InvalidAddress::new("postal code must be at most 99999"));
        }

        Ok(Address {
            street,
            house_number,
            city,
            postal_code,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tu_berlin() -> AddressBuilder {
        Address::builder()
            .street("Straße des 17. Juni")
            .house_number("135")
            .city("Berlin")
            .postal_code(10623)
    }

    #[test]
    fn builds_complete_address() {
        let address = tu_berlin().build().unwrap();
        assert_eq!(address.street(), "Straße des 17. Juni");
        assert_eq!(address.house_number(), "135");
        assert_eq!(address.city(), "Berlin");
        assert_eq!(address.postal_code(), 10623);
    }

    #[test]
    fn missing_fields_are_rejected() {
        assert!(Address::builder().build().is_err());
        assert!(Address::builder().street("A").build().is_err());
        assert!(
            Address::builder()
                .street("A")
                .house_number("1")
                .city("B")
                .build()
                .is_err()
        );
    }

    #[test]
    fn empty_fields_are_rejected() {
        assert!(tu_berlin().street("").build().is_err());
        assert!(tu_berlin().house_number("   ").build().is_err());
        assert!(tu_berlin().city("").build().is_err());
    }

    #[test]
    fn postal_code_upper_bound() {
        assert!(tu_berlin().postal_code(99_999).build().is_ok());
        assert!(tu_berlin().postal_code(100_000).build().is_err());
    }

    #[test]
    fn postal_code_is_zero_padded() {
        let address = tu_berlin().postal_code(1067).build().unwrap();
        assert_eq!(address.postal_code_string(), "01067");

        let address = tu_berlin().postal_code(0).build().unwrap();
        assert_eq!(address.postal_code_string(), "00000");
    }

    #[test]
    fn house_number_suffixes_are_kept() {
        let address = tu_berlin().house_number("12a").build().unwrap();
        assert_eq!(address.house_number(), "12a");
    }

    #[test]
    fn display_reads_like_an_envelope() {
        let address = tu_berlin().build().unwrap();
        assert_eq!(
            format!("{}", address),
            "Straße des 17. Juni 135, 10623 Berlin"
        );
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Every postal code in range builds and renders as five digits.
        #[test]
        fn postal_codes_in_range_build(code in 0u32..=99_999) {
            let address = Address::builder()
                .street("Teststraße")
                .house_number("1")
                .city("Berlin")
                .postal_code(code)
                .build();
            prop_assert!(address.is_ok());
            let rendered = address.unwrap().postal_code_string();
            prop_assert_eq!(rendered.len(), 5);
            prop_assert_eq!(rendered.parse::<u32>().unwrap(), code);
        }

        /// Every postal code above the range is rejected.
        #[test]
        fn postal_codes_out_of_range_fail(code in 100_000u32..) {
            let address = Address::builder()
                .street("Teststraße")
                .house_number("1")
                .city("Berlin")
                .postal_code(code)
                .build();
            prop_assert!(address.is_err());
        }
    }
}
