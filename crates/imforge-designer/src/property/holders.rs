//! The five value holders. Widget payloads are built from these and nothing
//! else, so every attribute is reachable through the descriptor lists.

use imforge_source::{Rhs, Token};

use super::ident::{is_identifier, rename_identifier};
use super::{parse_text_as_source, HolderKind, Literal, PropertyValue, Sealed, ValueError, ValueType};

// ── Direct ────────────────────────────────────────────────────────────────

/// A fixed literal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Direct<T>(T);

impl<T: Literal> Direct<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(&self) -> &T {
        &self.0
    }

    pub fn set(&mut self, value: T) {
        self.0 = value;
    }
}

impl<T: Literal> Sealed for Direct<T> {}

impl<T: Literal> PropertyValue for Direct<T> {
    fn kind(&self) -> HolderKind {
        HolderKind::Direct(self.0.value_type())
    }

    fn to_text(&self) -> String {
        self.0.to_text()
    }

    fn set_text(&mut self, text: &str) -> Result<(), ValueError> {
        self.0 = self.0.parse_text(text)?;
        Ok(())
    }

    fn to_source(&self) -> String {
        self.0.to_source()
    }

    fn set_source(&mut self, rhs: &Rhs<'_>) -> Result<(), ValueError> {
        self.0 = self.0.parse_source(rhs)?;
        Ok(())
    }

    fn rename_field(&mut self, old: &str, new: &str) -> bool {
        self.0.rename_field(old, new)
    }

    fn scale(&mut self, factor: f32) {
        self.0.scale(factor);
    }
}

// ── Bindable ──────────────────────────────────────────────────────────────

/// Either a literal or a host expression evaluated at draw time.
///
/// In the editor a binding is written `{expr}`. String-typed holders are the
/// exception: their literal may itself interpolate `{expr}` segments, so
/// their editor text is always a literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Bindable<T> {
    Value(T),
    Bound(String),
}

impl<T: Default> Default for Bindable<T> {
    fn default() -> Self {
        Bindable::Value(T::default())
    }
}

impl<T: Literal + Default> Bindable<T> {
    pub fn new(value: T) -> Self {
        Bindable::Value(value)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Bindable::Value(v) => Some(v),
            Bindable::Bound(_) => None,
        }
    }

    pub fn binding(&self) -> Option<&str> {
        match self {
            Bindable::Value(_) => None,
            Bindable::Bound(e) => Some(e),
        }
    }

    #[inline]
    pub fn is_bound(&self) -> bool {
        matches!(self, Bindable::Bound(_))
    }

    pub fn set_value(&mut self, value: T) {
        *self = Bindable::Value(value);
    }

    /// Binds to `expr`. An expression that reads as a literal of `T` is
    /// stored as that literal.
    pub fn bind(&mut self, expr: &str) -> Result<(), ValueError> {
        *self = parse_text_as_source(expr, |rhs| self.from_rhs(rhs))?;
        Ok(())
    }

    fn proto(&self) -> T {
        self.value().cloned().unwrap_or_default()
    }

    fn from_rhs(&self, rhs: &Rhs<'_>) -> Result<Self, ValueError> {
        let proto = self.proto();
        match proto.parse_source(rhs) {
            Ok(v) => Ok(Bindable::Value(v)),
            Err(_) if rhs.is_balanced_expr() && !is_literal_token(rhs) => {
                Ok(Bindable::Bound(rhs.text().to_string()))
            }
            Err(e) => Err(e),
        }
    }
}

/// A lone literal token (string, char or number) of the wrong type is a
/// typing mistake, not a data binding.
fn is_literal_token(rhs: &Rhs<'_>) -> bool {
    matches!(rhs.single(), Some(Token::Str(_) | Token::Char(_) | Token::Number(_))) || rhs.number().is_some()
}

impl<T: Literal + Default> Sealed for Bindable<T> {}

impl<T: Literal + Default> PropertyValue for Bindable<T> {
    fn kind(&self) -> HolderKind {
        HolderKind::Bindable(self.proto().value_type())
    }

    fn to_text(&self) -> String {
        match self {
            Bindable::Value(v) => v.to_text(),
            Bindable::Bound(e) => format!("{{{}}}", e),
        }
    }

    fn set_text(&mut self, text: &str) -> Result<(), ValueError> {
        let proto = self.proto();
        let t = text.trim();
        if proto.value_type() != ValueType::String && t.starts_with('{') && t.ends_with('}') && t.len() >= 2 {
            return self.bind(&t[1..t.len() - 1]);
        }
        *self = Bindable::Value(proto.parse_text(text)?);
        Ok(())
    }

    fn to_source(&self) -> String {
        match self {
            Bindable::Value(v) => v.to_source(),
            Bindable::Bound(e) => e.clone(),
        }
    }

    fn set_source(&mut self, rhs: &Rhs<'_>) -> Result<(), ValueError> {
        *self = self.from_rhs(rhs)?;
        Ok(())
    }

    fn rename_field(&mut self, old: &str, new: &str) -> bool {
        match self {
            Bindable::Value(v) => v.rename_field(old, new),
            Bindable::Bound(e) => match rename_identifier(e, old, new) {
                Some(renamed) => {
                    *e = renamed;
                    true
                }
                None => false,
            },
        }
    }

    fn scale(&mut self, factor: f32) {
        if let Bindable::Value(v) = self {
            v.scale(factor);
        }
    }
}

// ── FieldRef ──────────────────────────────────────────────────────────────

/// Declared type of the application field a widget edits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FieldType {
    #[default]
    Any,
    Bool,
    Int,
    Float,
    String,
    Color,
    Texture,
}

/// A named reference into the application's data model. An empty name means
/// the widget is not connected yet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldRef {
    name: String,
    ty: FieldType,
}

impl FieldRef {
    pub fn new(ty: FieldType) -> Self {
        Self { name: String::new(), ty }
    }

    pub fn named(ty: FieldType, name: &str) -> Result<Self, ValueError> {
        let mut f = Self::new(ty);
        f.set_text(name)?;
        Ok(f)
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn field_type(&self) -> FieldType {
        self.ty
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }
}

/// `a`, `a.b`, `a->b`, `ns::a`, `a[i].b`, as one compact lvalue path.
fn lvalue_path(rhs: &Rhs<'_>) -> Option<String> {
    let toks = rhs.tokens();
    let mut i = 0;
    let mut expect_name = true;
    let mut depth = 0;
    while i < toks.len() {
        let t = &toks[i].token;
        if depth > 0 {
            match t {
                Token::Punct("[") => depth += 1,
                Token::Punct("]") => depth -= 1,
                Token::Punct(";") | Token::Comment(_) => return None,
                _ => {}
            }
        } else if expect_name {
            t.ident()?;
            expect_name = false;
        } else {
            match t {
                Token::Punct("." | "->" | "::") => expect_name = true,
                Token::Punct("[") => depth = 1,
                _ => return None,
            }
        }
        i += 1;
    }
    (!expect_name && depth == 0).then(|| rhs.compact())
}

impl Sealed for FieldRef {}

impl PropertyValue for FieldRef {
    fn kind(&self) -> HolderKind {
        HolderKind::Field(self.ty)
    }

    fn to_text(&self) -> String {
        self.name.clone()
    }

    fn set_text(&mut self, text: &str) -> Result<(), ValueError> {
        if text.trim().is_empty() {
            self.name.clear();
            return Ok(());
        }
        self.name = parse_text_as_source(text, |rhs| {
            lvalue_path(rhs).ok_or_else(|| ValueError::expected("a field name", text))
        })?;
        Ok(())
    }

    fn to_source(&self) -> String {
        self.name.clone()
    }

    fn set_source(&mut self, rhs: &Rhs<'_>) -> Result<(), ValueError> {
        self.name = lvalue_path(rhs).ok_or_else(|| ValueError::expected("a field name", rhs.text()))?;
        Ok(())
    }

    fn rename_field(&mut self, old: &str, new: &str) -> bool {
        match rename_identifier(&self.name, old, new) {
            Some(renamed) => {
                self.name = renamed;
                true
            }
            None => false,
        }
    }
}

// ── EventSlot ─────────────────────────────────────────────────────────────

/// Name of a host handler method. `args` names the typed argument payload
/// passed to handlers of custom-draw style events.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventSlot {
    handler: String,
    args: Option<&'static str>,
}

impl EventSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_args(args: &'static str) -> Self {
        Self { handler: String::new(), args: Some(args) }
    }

    #[inline]
    pub fn handler(&self) -> &str {
        &self.handler
    }

    #[inline]
    pub fn args(&self) -> Option<&'static str> {
        self.args
    }

    pub fn set_handler(&mut self, handler: &str) -> Result<(), ValueError> {
        self.set_text(handler)
    }
}

impl Sealed for EventSlot {}

impl PropertyValue for EventSlot {
    fn kind(&self) -> HolderKind {
        HolderKind::Event { args: self.args }
    }

    fn to_text(&self) -> String {
        self.handler.clone()
    }

    fn set_text(&mut self, text: &str) -> Result<(), ValueError> {
        let t = text.trim();
        if !t.is_empty() && !t.split("::").all(is_identifier) {
            return Err(ValueError::expected("a handler name", t));
        }
        self.handler = t.to_string();
        Ok(())
    }

    fn to_source(&self) -> String {
        self.handler.clone()
    }

    fn set_source(&mut self, rhs: &Rhs<'_>) -> Result<(), ValueError> {
        self.handler = rhs.path().ok_or_else(|| ValueError::expected("a handler name", rhs.text()))?;
        Ok(())
    }
}

// ── DataLoop ──────────────────────────────────────────────────────────────

/// Repetition of a container body at draw time: `count` iterations over
/// index variable `index`, skipping those where `filter` is false.
///
/// Editor text: `count`, optionally followed by ` as index` and
/// ` if filter`, e.g. `{items.size()} as j if items[j].visible`.
#[derive(Debug, Clone, PartialEq)]
pub struct DataLoop {
    count: Bindable<i32>,
    index: String,
    filter: String,
}

impl Default for DataLoop {
    fn default() -> Self {
        Self { count: Bindable::Value(1), index: "i".to_string(), filter: String::new() }
    }
}

impl DataLoop {
    #[inline]
    pub fn count(&self) -> &Bindable<i32> {
        &self.count
    }

    #[inline]
    pub fn index(&self) -> &str {
        &self.index
    }

    pub fn filter(&self) -> Option<&str> {
        (!self.filter.is_empty()).then_some(self.filter.as_str())
    }

    /// `true` when the body is drawn exactly once, unfiltered.
    pub fn is_single(&self) -> bool {
        self.count == Bindable::Value(1) && self.filter.is_empty()
    }

    pub fn set_filter(&mut self, filter: &str) -> Result<(), ValueError> {
        let f = filter.trim();
        if !f.is_empty() {
            loop_argument(f, "a filter expression")?;
        }
        self.filter = f.to_string();
        Ok(())
    }

    fn set_index(&mut self, index: &str) -> Result<(), ValueError> {
        let index = index.trim();
        if !is_identifier(index) {
            return Err(ValueError::expected("an index variable", index));
        }
        self.index = index.to_string();
        Ok(())
    }
}

/// Count and filter are written as arguments of one call, so neither may
/// hold a comma outside brackets.
fn loop_argument(expr: &str, what: &str) -> Result<(), ValueError> {
    parse_text_as_source(expr, |rhs| {
        if rhs.is_balanced_expr() && rhs.split_top_level(",").len() == 1 {
            Ok(())
        } else {
            Err(ValueError::expected(what, expr))
        }
    })
}

impl Sealed for DataLoop {}

impl PropertyValue for DataLoop {
    fn kind(&self) -> HolderKind {
        HolderKind::Loop
    }

    fn to_text(&self) -> String {
        let mut out = self.count.to_text();
        if self.index != "i" || !self.filter.is_empty() {
            out.push_str(" as ");
            out.push_str(&self.index);
        }
        if !self.filter.is_empty() {
            out.push_str(" if ");
            out.push_str(&self.filter);
        }
        out
    }

    fn set_text(&mut self, text: &str) -> Result<(), ValueError> {
        let mut next = DataLoop::default();
        let (head, filter) = match text.split_once(" if ") {
            Some((h, f)) => (h, f),
            None => (text, ""),
        };
        let (count, index) = match head.split_once(" as ") {
            Some((c, i)) => (c, i),
            None => (head, "i"),
        };
        if count.trim().is_empty() {
            return Err(ValueError::expected("an iteration count", text));
        }
        next.count.set_text(count)?;
        if let Bindable::Bound(e) = &next.count {
            loop_argument(e, "a count expression")?;
        }
        next.set_index(index)?;
        next.set_filter(filter)?;
        *self = next;
        Ok(())
    }

    fn to_source(&self) -> String {
        if self.filter.is_empty() {
            format!("ImRad::Loop({}, {})", self.count.to_source(), self.index)
        } else {
            format!("ImRad::Loop({}, {}, {})", self.count.to_source(), self.index, self.filter)
        }
    }

    fn set_source(&mut self, rhs: &Rhs<'_>) -> Result<(), ValueError> {
        let bad = || ValueError::expected("ImRad::Loop(count, index[, filter])", rhs.text());
        let (callee, args) = rhs.call().ok_or_else(bad)?;
        if callee != "ImRad::Loop" || !(2..=3).contains(&args.len()) {
            return Err(bad());
        }
        let mut next = DataLoop::default();
        next.count.set_source(&args[0])?;
        next.set_index(args[1].text())?;
        if let Some(filter) = args.get(2) {
            if !filter.is_balanced_expr() {
                return Err(bad());
            }
            next.filter = filter.text().to_string();
        }
        *self = next;
        Ok(())
    }

    fn rename_field(&mut self, old: &str, new: &str) -> bool {
        let mut changed = self.count.rename_field(old, new);
        if let Some(renamed) = rename_identifier(&self.filter, old, new) {
            self.filter = renamed;
            changed = true;
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use imforge_source::Lexer;

    use super::*;
    use crate::property::{Dimension, Px2};

    fn set_src(v: &mut dyn PropertyValue, text: &str) -> Result<(), ValueError> {
        let toks = Lexer::new(text).tokenize().unwrap();
        v.set_source(&Rhs::new(text, &toks))
    }

    #[test]
    fn bindable_literal_or_expression() {
        let mut b: Bindable<bool> = Bindable::new(false);
        set_src(&mut b, "done").unwrap();
        assert_eq!(b.binding(), Some("done"));
        assert_eq!(b.to_text(), "{done}");
        set_src(&mut b, "true").unwrap();
        assert_eq!(b, Bindable::Value(true));
    }

    #[test]
    fn literal_looking_binding_is_canonicalised() {
        let mut b: Bindable<i32> = Bindable::default();
        b.set_text("{ 42 }").unwrap();
        assert_eq!(b, Bindable::Value(42));
    }

    #[test]
    fn wrong_literal_is_not_a_binding() {
        let mut b: Bindable<bool> = Bindable::default();
        assert!(set_src(&mut b, "\"yes\"").is_err());
        assert!(set_src(&mut b, "3").is_err());
        assert_eq!(b, Bindable::Value(false));
    }

    #[test]
    fn string_text_never_binds() {
        let mut b: Bindable<String> = Bindable::default();
        b.set_text("{name}").unwrap();
        assert_eq!(b, Bindable::Value("{name}".to_string()));
        set_src(&mut b, "user.name").unwrap();
        assert_eq!(b.binding(), Some("user.name"));
    }

    #[test]
    fn bound_dimension_survives_scaling() {
        let mut d: Bindable<Dimension> = Bindable::default();
        d.set_text("{width * 2}").unwrap();
        d.scale(3.0);
        assert_eq!(d.to_source(), "width * 2");
        let mut p: Direct<Option<Px2>> = Direct::default();
        p.set_text("4, 2").unwrap();
        p.scale(2.0);
        assert_eq!(p.get(), &Some(Px2::new(8.0, 4.0)));
    }

    #[test]
    fn field_paths() {
        let mut f = FieldRef::new(FieldType::Bool);
        f.set_text("items[i + 1] . done").unwrap();
        assert_eq!(f.name(), "items[i+1].done");
        assert!(f.set_text("a + b").is_err());
        assert!(f.set_text("a.").is_err());
        f.set_text("").unwrap();
        assert!(f.is_empty());
    }

    #[test]
    fn field_rename_is_exact() {
        let mut f = FieldRef::named(FieldType::Int, "count").unwrap();
        assert!(!f.rename_field("count2", "n"));
        assert!(f.rename_field("count", "n"));
        assert_eq!(f.name(), "n");
    }

    #[test]
    fn event_handler_names() {
        let mut e = EventSlot::with_args("const ImRad::CustomWidgetArgs&");
        e.set_text("OnDraw").unwrap();
        assert_eq!(e.kind(), HolderKind::Event { args: Some("const ImRad::CustomWidgetArgs&") });
        assert!(e.set_text("On Draw").is_err());
        set_src(&mut e, "Base::OnDraw").unwrap();
        assert_eq!(e.handler(), "Base::OnDraw");
    }

    #[test]
    fn data_loop_text_and_source() {
        let mut l = DataLoop::default();
        assert!(l.is_single());
        l.set_text("{items.size()} as j if items[j].visible").unwrap();
        assert_eq!(l.to_source(), "ImRad::Loop(items.size(), j, items[j].visible)");
        let mut m = DataLoop::default();
        set_src(&mut m, &l.to_source()).unwrap();
        assert_eq!(m, l);
        l.set_text("3").unwrap();
        assert_eq!(l.to_text(), "3");
        assert_eq!(l.index(), "i");
    }

    #[test]
    fn data_loop_rejects_top_level_commas() {
        let mut l = DataLoop::default();
        assert!(l.set_text("{a, b}").is_err());
        assert!(l.set_text("3 if x, y").is_err());
        assert!(l.is_single());

        l.set_text("{count(a, b)} as j if keep(j, a)").unwrap();
        assert_eq!(l.to_source(), "ImRad::Loop(count(a, b), j, keep(j, a))");
        let mut m = DataLoop::default();
        set_src(&mut m, &l.to_source()).unwrap();
        assert_eq!(m, l);
    }

    #[test]
    fn data_loop_rename() {
        let mut l = DataLoop::default();
        l.set_text("{rows.size()} if rows[i].shown").unwrap();
        assert!(l.rename_field("rows", "lines"));
        assert_eq!(l.to_source(), "ImRad::Loop(lines.size(), i, lines[i].shown)");
    }
}
