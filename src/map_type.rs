/// Map render style, cycled by the toggle control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapType {
    #[default]
    Standard,
    Satellite,
    Hybrid,
}

impl MapType {
    /// Advance one step in the cycle `standard -> satellite -> hybrid`.
    pub fn next(self) -> Self {
        match self {
            MapType::Standard => MapType::Satellite,
            MapType::Satellite => MapType::Hybrid,
            MapType::Hybrid => MapType::Standard,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MapType::Standard => "standard",
            MapType::Satellite => "satellite",
            MapType::Hybrid => "hybrid",
        }
    }
}
