use crate::attr::Attr;
use crate::error::{RenderError, RenderResult};

/// One step of context bound to a handler: either a group name or a list of attributes.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    group: Option<String>,
    attrs: Vec<Attr>,
}

/// Borrowed view of a [`Frame`] once it is known to be well-formed.
#[derive(Debug, PartialEq)]
pub enum FrameKind<'a> {
    Group(&'a str),
    Attrs(&'a [Attr]),
}

impl Frame {
    pub fn group(name: impl Into<String>) -> Self {
        Frame {
            group: Some(name.into()),
            attrs: Vec::new(),
        }
    }

    pub fn attrs(attrs: Vec<Attr>) -> Self {
        Frame { group: None, attrs }
    }

    pub fn is_group(&self) -> bool {
        self.group.as_deref().is_some_and(|name| !name.is_empty())
    }

    pub fn kind(&self) -> RenderResult<FrameKind<'_>> {
        match self.group.as_deref() {
            Some(name) if !name.is_empty() && !self.attrs.is_empty() => {
                Err(RenderError::InvalidFrame)
            }
            Some(name) if !name.is_empty() => Ok(FrameKind::Group(name)),
            _ => Ok(FrameKind::Attrs(&self.attrs)),
        }
    }
}

#[cfg(test)]
impl Frame {
    pub(crate) fn invalid(name: &str, attrs: Vec<Attr>) -> Self {
        Frame {
            group: Some(name.to_string()),
            attrs,
        }
    }
}
