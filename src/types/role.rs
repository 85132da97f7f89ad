use std::fmt;

/// Selects which connection, endpoint list and escaper a statement uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Read,
    Write,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Read, Role::Write];

    pub(crate) fn index(self) -> usize {
        match self {
            Role::Read => 0,
            Role::Write => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Read => "read",
            Role::Write => "write",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
