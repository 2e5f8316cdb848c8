use bitflags::bitflags;

bitflags! {
    /// Whether a field takes part in serialization, deserialization, both or neither.
    ///
    /// The two bits are independent, [`Direction::IGNORE`] has neither set.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_contract::info::Direction;
    ///
    /// assert_eq!(Direction::default(), Direction::BOTH);
    /// assert!(Direction::SERIALIZE_ONLY.serializes());
    /// assert!(!Direction::SERIALIZE_ONLY.deserializes());
    /// assert!(!Direction::IGNORE.serializes());
    /// ```
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Direction: u8 {
        /// Set if the field is written by serialization.
        const SERIALIZE_ONLY    = 1 << 0;
        /// Set if the field is read by deserialization.
        const DESERIALIZE_ONLY  = 1 << 1;
        const BOTH = Self::SERIALIZE_ONLY.bits() | Self::DESERIALIZE_ONLY.bits();
    }
}

impl Direction {
    /// Neither serialized nor deserialized.
    pub const IGNORE: Self = Self::empty();

    #[inline]
    pub const fn serializes(self) -> bool {
        self.contains(Self::SERIALIZE_ONLY)
    }

    #[inline]
    pub const fn deserializes(self) -> bool {
        self.contains(Self::DESERIALIZE_ONLY)
    }
}

impl Default for Direction {
    #[inline]
    fn default() -> Self {
        Self::BOTH
    }
}
