//! Text rendering of log lines.
//!
//! Attributes are rendered as `key=value` pairs separated by `, `. Group values and bound
//! group frames open a parenthesis which is closed once their content is complete:
//!
//! ```text
//! 2024-03-01T12:30:05.042Z INFO request served (http=(method=GET, status=200), took=12ms)
//! ```
//!
//! Values are written verbatim. Delimiters contained in values are not escaped.

use crate::attr::{Attr, Value};
use crate::error::RenderResult;
use std::fmt::Write;

mod frame;
mod header;
mod parens;

pub use frame::{Frame, FrameKind};
pub use header::write_header;
pub use parens::ParenStack;

fn renderable(attrs: &[Attr]) -> impl Iterator<Item = &Attr> {
    attrs.iter().filter(|attr| !attr.is_empty())
}

/// Renders a single attribute.
///
/// Unless `first` is set, the attribute is prefixed with `, `. Empty attributes produce no
/// output at all.
pub fn render_attr<W: Write>(
    parens: &mut ParenStack<W>,
    attr: &Attr,
    first: bool,
) -> std::fmt::Result {
    if attr.is_empty() {
        return Ok(());
    }

    if !first {
        parens.write_str(", ")?;
    }
    write!(parens, "{}=", attr.key)?;

    match &attr.value {
        Value::Group(children) => {
            parens.push()?;
            for (index, child) in renderable(children).enumerate() {
                render_attr(parens, child, index == 0)?;
            }
            parens.pop()
        }
        value => write!(parens, "{}", value),
    }
}

/// Renders the bound frames followed by the attributes of the current record.
///
/// The whole region is written as ` (...)` and skipped entirely if there is nothing to
/// print. Group frames stay open until the end of the region, so everything bound after a
/// group (including the record's own attributes) is nested inside it.
pub fn write_region(writer: &mut impl Write, frames: &[Frame], attrs: &[Attr]) -> RenderResult<()> {
    let has_attrs = renderable(attrs).next().is_some();
    let frames = if has_attrs {
        frames
    } else {
        strip_trailing_groups(frames)
    };

    let mut region = Region::new(writer);
    for frame in frames {
        match frame.kind()? {
            FrameKind::Group(name) => region.group(name)?,
            FrameKind::Attrs(bound) => {
                for attr in renderable(bound) {
                    region.attr(attr)?;
                }
            }
        }
    }

    for attr in renderable(attrs) {
        region.attr(attr)?;
    }

    region.finish()?;

    Ok(())
}

/// Drops trailing frames which would open a group without anything to put inside.
fn strip_trailing_groups(mut frames: &[Frame]) -> &[Frame] {
    while let Some((last, rest)) = frames.split_last() {
        let bare = match last.kind() {
            Ok(FrameKind::Attrs(attrs)) => renderable(attrs).next().is_none(),
            _ => last.is_group(),
        };
        if !bare {
            break;
        }
        frames = rest;
    }

    frames
}

/// Tracks where the walk over frames and attributes currently stands.
///
/// `leftmost` is set whenever the next item starts a new nesting level. That level's
/// parenthesis is only written once an item actually arrives.
struct Region<W> {
    parens: ParenStack<W>,
    leftmost: bool,
}

impl<W: Write> Region<W> {
    fn new(writer: W) -> Self {
        Region {
            parens: ParenStack::new(writer),
            leftmost: true,
        }
    }

    fn open(&mut self) -> std::fmt::Result {
        if self.parens.is_empty() {
            self.parens.write_char(' ')?;
        }
        self.parens.push()
    }

    fn group(&mut self, name: &str) -> std::fmt::Result {
        if self.leftmost {
            self.open()?;
        } else {
            self.parens.write_str(", ")?;
        }
        write!(self.parens, "{}=", name)?;
        self.leftmost = true;

        Ok(())
    }

    fn attr(&mut self, attr: &Attr) -> std::fmt::Result {
        if self.leftmost {
            self.open()?;
        }
        render_attr(&mut self.parens, attr, self.leftmost)?;
        self.leftmost = false;

        Ok(())
    }

    fn finish(mut self) -> std::fmt::Result {
        self.parens.close_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attrs;
    use crate::error::RenderError;

    fn region(frames: &[Frame], attrs: &[Attr]) -> String {
        let mut buf = String::new();
        write_region(&mut buf, frames, attrs).unwrap();
        buf
    }

    fn bound(path: &[(&str, Vec<Attr>)]) -> Vec<Frame> {
        let mut frames = Vec::new();
        for (group, attrs) in path {
            if !group.is_empty() {
                frames.push(Frame::group(*group));
            }
            if !attrs.is_empty() {
                frames.push(Frame::attrs(attrs.clone()));
            }
        }
        frames
    }

    fn is_balanced(text: &str) -> bool {
        let mut depth = 0i32;
        for c in text.chars() {
            match c {
                '(' => depth += 1,
                ')' => depth -= 1,
                _ => {}
            }
            if depth < 0 {
                return false;
            }
        }
        depth == 0
    }

    #[test]
    fn nothing_to_render_writes_nothing() {
        assert_eq!(region(&[], &[]), "");
    }

    #[test]
    fn single_attribute() {
        assert_eq!(region(&[], &attrs!["key" => "value"]), " (key=value)");
    }

    #[test]
    fn sibling_attributes_are_comma_separated() {
        assert_eq!(
            region(&[], &attrs!["key1" => "value1", "key2" => "value2"]),
            " (key1=value1, key2=value2)"
        );
    }

    #[test]
    fn group_attribute() {
        let attrs = vec![Attr::group("outerKey", attrs!["innerKey" => "value"])];

        assert_eq!(region(&[], &attrs), " (outerKey=(innerKey=value))");
    }

    #[test]
    fn nested_group_attributes() {
        let attrs = vec![Attr::group(
            "outerKey",
            vec![Attr::group("middleKey", attrs!["innerKey1" => 1, "innerKey2" => 2])],
        )];

        assert_eq!(
            region(&[], &attrs),
            " (outerKey=(middleKey=(innerKey1=1, innerKey2=2)))"
        );
    }

    #[test]
    fn group_followed_by_sibling() {
        let attrs = vec![
            Attr::group("outer", attrs!["a" => 1, "b" => 2]),
            Attr::new("c", 3),
        ];

        assert_eq!(region(&[], &attrs), " (outer=(a=1, b=2), c=3)");
    }

    #[test]
    fn empty_group_attribute_keeps_its_parentheses() {
        let attrs = vec![Attr::group("nothing", vec![]), Attr::new("k", "v")];

        assert_eq!(region(&[], &attrs), " (nothing=(), k=v)");
    }

    #[test]
    fn empty_attributes_are_skipped_without_affecting_commas() {
        let attrs = vec![
            Attr::empty(),
            Attr::new("a", 1),
            Attr::group("g", vec![Attr::empty(), Attr::new("b", 2)]),
            Attr::empty(),
        ];

        assert_eq!(region(&[], &attrs), " (a=1, g=(b=2))");
        assert_eq!(region(&[], &[Attr::empty()]), "");
    }

    #[test]
    fn null_values_with_a_key_are_rendered() {
        assert_eq!(region(&[], &[Attr::new("k", Value::Null)]), " (k=null)");
    }

    #[test]
    fn values_are_not_escaped() {
        assert_eq!(
            region(&[], &attrs!["k" => "a=(b, c)"]),
            " (k=a=(b, c))"
        );
    }

    #[test]
    fn bound_groups_nest_everything_after_them() {
        let frames = bound(&[
            ("g1", attrs!["k1" => "v1"]),
            ("g2", attrs!["k2" => "v2"]),
        ]);

        assert_eq!(region(&frames, &[]), " (g1=(k1=v1, g2=(k2=v2)))");
        assert_eq!(
            region(&frames, &attrs!["k3" => "v3"]),
            " (g1=(k1=v1, g2=(k2=v2, k3=v3)))"
        );
    }

    #[test]
    fn bound_attributes_precede_record_attributes() {
        let frames = bound(&[("", attrs!["a" => 1])]);

        assert_eq!(region(&frames, &attrs!["b" => 2]), " (a=1, b=2)");
    }

    #[test]
    fn consecutive_bound_groups() {
        let frames = bound(&[("g1", vec![]), ("g2", vec![])]);

        assert_eq!(region(&frames, &attrs!["k" => "v"]), " (g1=(g2=(k=v)))");
    }

    #[test]
    fn trailing_bound_groups_without_attributes_are_dropped() {
        assert_eq!(region(&bound(&[("g", vec![])]), &[]), "");
        assert_eq!(region(&bound(&[("g1", vec![]), ("g2", vec![])]), &[]), "");
        assert_eq!(
            region(&bound(&[("", attrs!["a" => 1]), ("g", vec![])]), &[]),
            " (a=1)"
        );
        assert_eq!(
            region(&bound(&[("g1", attrs!["a" => 1]), ("g2", vec![])]), &[]),
            " (g1=(a=1))"
        );
    }

    #[test]
    fn trailing_bound_group_is_kept_for_record_attributes() {
        let frames = bound(&[("", attrs!["a" => 1]), ("g", vec![])]);

        assert_eq!(region(&frames, &attrs!["b" => 2]), " (a=1, g=(b=2))");
    }

    #[test]
    fn trailing_group_is_dropped_when_record_attributes_are_all_empty() {
        let frames = bound(&[("g", vec![])]);

        assert_eq!(region(&frames, &[Attr::empty()]), "");
    }

    #[test]
    fn record_groups_nest_inside_bound_groups() {
        let frames = bound(&[("req", attrs!["id" => 7])]);
        let attrs = vec![Attr::group("db", attrs!["rows" => 3])];

        assert_eq!(region(&frames, &attrs), " (req=(id=7, db=(rows=3)))");
    }

    #[test]
    fn invalid_frame_is_reported() {
        let frames = vec![Frame::invalid("g", attrs!["k" => "v"]), Frame::attrs(attrs!["a" => 1])];
        let mut buf = String::new();

        let result = write_region(&mut buf, &frames, &attrs!["x" => 1]);

        assert!(matches!(result, Err(RenderError::InvalidFrame)));
    }

    #[test]
    fn delimiters_are_balanced_and_commas_match_siblings() {
        // Record attributes land one level below the last bound group, so siblings are
        // counted at that depth.
        let cases: Vec<(Vec<Frame>, Vec<Attr>, usize)> = vec![
            (vec![], attrs!["a" => 1, "b" => 2, "c" => 3], 2),
            (
                bound(&[("g", attrs!["a" => 1])]),
                vec![Attr::group("h", attrs!["x" => 1, "y" => 2]), Attr::new("b", 2)],
                2,
            ),
            (bound(&[("g1", vec![]), ("g2", attrs!["a" => 1])]), vec![], 0),
            (
                bound(&[("g1", vec![]), ("g2", attrs!["a" => 1, "b" => 2])]),
                attrs!["c" => 3],
                2,
            ),
            (
                bound(&[("", attrs!["a" => 1]), ("g", attrs!["b" => 2, "c" => 3])]),
                attrs!["d" => 4],
                2,
            ),
            (
                vec![],
                vec![Attr::group("g", vec![Attr::group("h", attrs!["a" => 1, "b" => 2])]), Attr::new("c", 3)],
                1,
            ),
        ];

        for (frames, attrs, sibling_commas) in cases {
            let text = region(&frames, &attrs);
            assert!(is_balanced(&text), "unbalanced: {}", text);

            let innermost = 1 + frames.iter().filter(|frame| frame.is_group()).count();
            let mut depth = 0;
            let mut commas = 0;
            for c in text.chars() {
                match c {
                    '(' => depth += 1,
                    ')' => depth -= 1,
                    ',' if depth == innermost => commas += 1,
                    _ => {}
                }
            }
            assert_eq!(commas, sibling_commas, "in {}", text);
        }
    }
}
