use crate::error::Error;
use std::fmt;

/// The path from the root node to a visited node.
///
/// A path is printed and parsed as its segments joined by dots, e.g.
/// `0.selectionSet.1.arguments.0`. Indices into the root document's definitions or a selection
/// set's selections directly follow their parent's segment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Path {
    pub segments: Vec<PathSegment>,
}

impl Path {
    pub fn push(&mut self, segment: PathSegment) {
        self.segments.push(segment)
    }

    pub fn pop(&mut self) -> Option<PathSegment> {
        self.segments.pop()
    }

    /// Removes the last `count` segments from the path.
    #[inline]
    pub(crate) fn pop_many(&mut self, count: usize) {
        let len = self.segments.len().saturating_sub(count);
        self.segments.truncate(len);
    }

    /// Returns the last segment of the path, which is the key of a node within its parent.
    #[inline]
    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl TryFrom<&str> for Path {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Ok(Self::default());
        }
        let segments = value
            .split('.')
            .map(PathSegment::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { segments })
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.segments
                .iter()
                .map(|segment| segment.to_string())
                .collect::<Vec<_>>()
                .join(".")
        )
    }
}

/// A key of a child node within its parent node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// The position of a node in a list of nodes.
    Index(usize),

    Alias,
    Arguments,
    DefaultValue,
    Directives,
    Name,
    SelectionSet,
    Type,
    TypeCondition,
    Value,
    Variable,
    VariableDefinitions,
}

impl TryFrom<&str> for PathSegment {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.parse::<usize>() {
            Ok(index) => Ok(Self::Index(index)),
            Err(_) => match value {
                "alias" => Ok(PathSegment::Alias),
                "arguments" => Ok(PathSegment::Arguments),
                "defaultValue" => Ok(PathSegment::DefaultValue),
                "directives" => Ok(PathSegment::Directives),
                "name" => Ok(PathSegment::Name),
                "selectionSet" => Ok(PathSegment::SelectionSet),
                "type" => Ok(PathSegment::Type),
                "typeCondition" => Ok(PathSegment::TypeCondition),
                "value" => Ok(PathSegment::Value),
                "variable" => Ok(PathSegment::Variable),
                "variableDefinitions" => Ok(PathSegment::VariableDefinitions),
                _ => Err(Error::new(format!("Invalid path segment {value}"), None)),
            },
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Index(index) => write!(f, "{}", index),
            PathSegment::Alias => f.write_str("alias"),
            PathSegment::Arguments => f.write_str("arguments"),
            PathSegment::DefaultValue => f.write_str("defaultValue"),
            PathSegment::Directives => f.write_str("directives"),
            PathSegment::Name => f.write_str("name"),
            PathSegment::SelectionSet => f.write_str("selectionSet"),
            PathSegment::Type => f.write_str("type"),
            PathSegment::TypeCondition => f.write_str("typeCondition"),
            PathSegment::Value => f.write_str("value"),
            PathSegment::Variable => f.write_str("variable"),
            PathSegment::VariableDefinitions => f.write_str("variableDefinitions"),
        }
    }
}
