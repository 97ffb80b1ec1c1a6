//! Range/length expression compiler (spec §4.4).

use yang_diagnostic::{Error, Result};
use yang_ir::{RangeId, SchemaPath};

/// Whether a range compares as `int64` or `uint64` (spec §4.4: signed
/// integers and `decimal64` use `int64`; unsigned integers and `length`
/// use `uint64`). Comparisons here use `i128` to host both without
/// overflow; the domain only decides what `min`/`max` resolve to.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum RangeDomain {
    Signed,
    Unsigned,
}

/// One `(min, max)` inclusive interval, already scaled by fraction-digits
/// for `decimal64`.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct RangePart {
    pub min: i128,
    pub max: i128,
}

impl RangePart {
    fn singleton(&self) -> bool {
        self.min == self.max
    }
}

/// A compiled, refcounted range or length restriction.
#[derive(Clone, Debug)]
pub struct CompiledRange {
    pub domain: RangeDomain,
    pub parts: Vec<RangePart>,
}

struct Slot {
    range: CompiledRange,
    refcount: u32,
}

/// Arena of compiled ranges/lengths, refcounted the same way as
/// [`yang_patterns::PatternPool`] (spec §3: "patterns and ranges are
/// separately refcounted").
#[derive(Default)]
pub struct RangePool {
    slots: Vec<Option<Slot>>,
    free: Vec<u32>,
}

impl RangePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, range: CompiledRange) -> RangeId {
        let slot = Slot { range, refcount: 1 };
        if let Some(idx) = self.free.pop() {
            self.slots[idx as usize] = Some(slot);
            RangeId::new(idx)
        } else {
            let idx = self.slots.len() as u32;
            self.slots.push(Some(slot));
            RangeId::new(idx)
        }
    }

    pub fn retain(&mut self, id: RangeId) {
        if let Some(slot) = self.slots[id.index()].as_mut() {
            slot.refcount += 1;
        }
    }

    pub fn release(&mut self, id: RangeId) -> Result<()> {
        let slot = self.slots[id.index()]
            .as_mut()
            .ok_or_else(|| Error::internal(SchemaPath::new(), "release of already-freed range"))?;
        slot.refcount -= 1;
        if slot.refcount == 0 {
            self.slots[id.index()] = None;
            self.free.push(id.raw());
        }
        Ok(())
    }

    pub fn get(&self, id: RangeId) -> Result<&CompiledRange> {
        Ok(&self.slots[id.index()]
            .as_ref()
            .ok_or_else(|| Error::internal(SchemaPath::new(), "range id freed"))?
            .range)
    }

    pub fn refcount(&self, id: RangeId) -> u32 {
        self.slots[id.index()].as_ref().map_or(0, |s| s.refcount)
    }
}

#[derive(Clone, Copy, Eq, PartialEq, Debug)]
enum Token<'a> {
    Min,
    Max,
    Number(&'a str),
    DotDot,
    Pipe,
}

fn tokenize<'a>(src: &'a str, path: &SchemaPath) -> Result<Vec<Token<'a>>> {
    let mut tokens = Vec::new();
    let bytes = src.as_bytes();
    let mut i = 0usize;
    while i < bytes.len() {
        let c = bytes[i] as char;
        if c.is_whitespace() {
            i += 1;
            continue;
        }
        if c == '|' {
            tokens.push(Token::Pipe);
            i += 1;
            continue;
        }
        if src[i..].starts_with("..") {
            tokens.push(Token::DotDot);
            i += 2;
            continue;
        }
        if src[i..].starts_with("min") && !src[i + 3..].starts_with(|c: char| c.is_alphanumeric()) {
            tokens.push(Token::Min);
            i += 3;
            continue;
        }
        if src[i..].starts_with("max") && !src[i + 3..].starts_with(|c: char| c.is_alphanumeric()) {
            tokens.push(Token::Max);
            i += 3;
            continue;
        }
        if c == '-' || c == '+' || c.is_ascii_digit() {
            let start = i;
            i += 1;
            while i < bytes.len() {
                let c = bytes[i] as char;
                if c.is_ascii_digit() || c == '.' {
                    i += 1;
                } else {
                    break;
                }
            }
            tokens.push(Token::Number(&src[start..i]));
            continue;
        }
        return Err(Error::syntax(
            path.clone(),
            format!("unexpected character '{c}' in range expression"),
        ));
    }
    Ok(tokens)
}

fn parse_number(text: &str, fraction_digits: u8, path: &SchemaPath) -> Result<i128> {
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, f),
        None => (text, ""),
    };
    if !frac_part.is_empty() && fraction_digits == 0 {
        return Err(Error::syntax(
            path.clone(),
            format!("'{text}' has a fractional part but the type has no fraction-digits"),
        ));
    }
    if frac_part.len() > fraction_digits as usize {
        return Err(Error::denied(
            path.clone(),
            format!("'{text}' has more fractional digits than fraction-digits allows"),
        ));
    }
    let int_value: i128 = int_part
        .parse()
        .map_err(|_| Error::syntax(path.clone(), format!("'{text}' is not a valid number")))?;
    let scale = 10i128.pow(u32::from(fraction_digits));
    let mut scaled = int_value.saturating_mul(scale);
    if !frac_part.is_empty() {
        let frac_value: i128 = frac_part
            .parse()
            .map_err(|_| Error::syntax(path.clone(), format!("'{text}' is not a valid number")))?;
        let pad = 10i128.pow(u32::from(fraction_digits) - frac_part.len() as u32);
        let frac_scaled = frac_value * pad;
        scaled = if int_value < 0 {
            scaled - frac_scaled
        } else {
            scaled + frac_scaled
        };
    }
    Ok(scaled)
}

/// Parse `"min | N..M | ..."` into an ordered, validated sequence of
/// inclusive intervals (spec §4.4).
pub fn compile_range(
    text: &str,
    domain: RangeDomain,
    fraction_digits: u8,
    base_min: i128,
    base_max: i128,
    path: &SchemaPath,
) -> Result<CompiledRange> {
    let tokens = tokenize(text, path)?;
    if tokens.is_empty() {
        return Err(Error::syntax(path.clone(), "empty range expression"));
    }
    let mut parts = Vec::new();
    let mut i = 0usize;
    let parse_bound = |tok: &Token<'_>, path: &SchemaPath| -> Result<i128> {
        match tok {
            Token::Min => Ok(base_min),
            Token::Max => Ok(base_max),
            Token::Number(n) => parse_number(n, fraction_digits, path),
            Token::DotDot | Token::Pipe => {
                Err(Error::syntax(path.clone(), "expected a range bound"))
            }
        }
    };
    while i < tokens.len() {
        let min = parse_bound(&tokens[i], path)?;
        i += 1;
        let max = if tokens.get(i) == Some(&Token::DotDot) {
            i += 1;
            let m = parse_bound(
                tokens
                    .get(i)
                    .ok_or_else(|| Error::syntax(path.clone(), "range missing upper bound"))?,
                path,
            )?;
            i += 1;
            m
        } else {
            min
        };
        if min > max {
            return Err(Error::exists(
                path.clone(),
                "range part's lower bound exceeds its upper bound",
            ));
        }
        if min < base_min || max > base_max {
            return Err(Error::denied(
                path.clone(),
                "range literal out of the base type's bounds",
            ));
        }
        parts.push(RangePart { min, max });
        match tokens.get(i) {
            Some(Token::Pipe) => {
                i += 1;
            }
            None => {}
            Some(_) => {
                return Err(Error::syntax(path.clone(), "expected '|' between range parts"))
            }
        }
    }
    for w in parts.windows(2) {
        if w[1].min <= w[0].max {
            return Err(Error::exists(
                path.clone(),
                "range parts must be strictly ascending and non-overlapping",
            ));
        }
    }
    Ok(CompiledRange { domain, parts })
}

/// Check that `derived` is equally or more limiting than `parent` (spec
/// §4.4): every derived interval must fall within the union of parent
/// intervals, walked with two cursors across the four described cases.
pub fn narrows(parent: &[RangePart], derived: &[RangePart]) -> bool {
    let (mut pi, mut di) = (0usize, 0usize);
    while di < derived.len() {
        let Some(&p) = parent.get(pi) else {
            return false;
        };
        let d = derived[di];
        if p.singleton() && d.singleton() && p.min == d.min {
            pi += 1;
            di += 1;
        } else if p.singleton() && p.min < d.min {
            pi += 1;
        } else if d.singleton() && d.min >= p.min && d.min <= p.max {
            di += 1;
        } else if d.max > p.max {
            if d.min > p.max {
                pi += 1;
            } else {
                return false;
            }
        } else {
            di += 1;
        }
    }
    true
}
