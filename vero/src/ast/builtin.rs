//! Native functions reachable through builtin-call keywords

use serde::{Deserialize, Serialize};

/// A native function known to the interpreter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Builtin {
    Print,
    Input,
    InputInt,
    Clear,
    IsNumber,
    IsString,
    IsList,
    IsFunction,
    Append,
    Pop,
    Extend,
    Len,
    Run,
}

impl Builtin {
    pub const ALL: [Builtin; 13] = [
        Builtin::Print,
        Builtin::Input,
        Builtin::InputInt,
        Builtin::Clear,
        Builtin::IsNumber,
        Builtin::IsString,
        Builtin::IsList,
        Builtin::IsFunction,
        Builtin::Append,
        Builtin::Pop,
        Builtin::Extend,
        Builtin::Len,
        Builtin::Run,
    ];

    /// Source-level name (also the global binding name)
    pub fn name(self) -> &'static str {
        match self {
            Builtin::Print => "print",
            Builtin::Input => "input",
            Builtin::InputInt => "input_int",
            Builtin::Clear => "clear",
            Builtin::IsNumber => "is_number",
            Builtin::IsString => "is_string",
            Builtin::IsList => "is_list",
            Builtin::IsFunction => "is_function",
            Builtin::Append => "append",
            Builtin::Pop => "pop",
            Builtin::Extend => "extend",
            Builtin::Len => "len",
            Builtin::Run => "run",
        }
    }

    /// Parameter names; `None` for variadic builtins
    pub fn params(self) -> Option<&'static [&'static str]> {
        match self {
            Builtin::Print => None,
            Builtin::Input | Builtin::InputInt | Builtin::Clear => Some(&[]),
            Builtin::IsNumber | Builtin::IsString | Builtin::IsList | Builtin::IsFunction => {
                Some(&["value"])
            }
            Builtin::Append => Some(&["list", "value"]),
            Builtin::Pop => Some(&["list", "index"]),
            Builtin::Extend => Some(&["list_a", "list_b"]),
            Builtin::Len => Some(&["value"]),
            Builtin::Run => Some(&["file_name"]),
        }
    }
}

impl std::fmt::Display for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<_> = Builtin::ALL.iter().map(|b| b.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Builtin::ALL.len());
    }

    #[test]
    fn test_arity() {
        assert_eq!(Builtin::Print.params(), None);
        assert_eq!(Builtin::Input.params().map(<[_]>::len), Some(0));
        assert_eq!(Builtin::Append.params().map(<[_]>::len), Some(2));
        assert_eq!(Builtin::Run.params().map(<[_]>::len), Some(1));
    }
}
