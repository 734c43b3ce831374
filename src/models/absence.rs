use serde::Serialize;

/// Non-work-day codes found in the start/end cells of uploaded schedules.
///
/// The meaning of each code is not documented by the source organization
/// (vacation, sick leave, absence, ...), so they are kept as opaque markers
/// that exclude the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AbsenceMarker {
    P,
    M,
    A,
    Bn,
}

impl AbsenceMarker {
    pub const ALL: [AbsenceMarker; 4] = [
        AbsenceMarker::P,
        AbsenceMarker::M,
        AbsenceMarker::A,
        AbsenceMarker::Bn,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            AbsenceMarker::P => "P",
            AbsenceMarker::M => "M",
            AbsenceMarker::A => "A",
            AbsenceMarker::Bn => "BN",
        }
    }

    /// Match a (trimmed) cell against the marker set, ignoring case.
    pub fn from_cell(cell: &str) -> Option<Self> {
        let c = cell.trim();
        Self::ALL
            .into_iter()
            .find(|m| m.code().eq_ignore_ascii_case(c))
    }
}
