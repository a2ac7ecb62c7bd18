//! Parser for the ASCII AIGER format (`aag`).
//!
//! Only the textual format is supported; the binary `aig` format is rejected with a clear error.
//! AIG loading sits outside the checker's core algorithm, so this parser favors a straightforward,
//! whole-file implementation over a streaming one.
use crate::error::AigerError;

/// The raw header fields of an AIGER file: `M I L O A`.
#[derive(Copy, Clone, Debug)]
pub struct Header {
    pub max_var: u32,
    pub num_inputs: u32,
    pub num_latches: u32,
    pub num_outputs: u32,
    pub num_and_gates: u32,
}

/// A parsed latch: its own literal, its next-state literal, and its reset value.
#[derive(Copy, Clone, Debug)]
pub struct LatchLine {
    pub lit: u32,
    pub next: u32,
    pub reset: Reset,
}

/// The declared reset behavior of a latch.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Reset {
    Low,
    High,
    /// AIGER allows a latch to reset to its own literal, meaning its initial value is undefined.
    /// The checker treats this the same as `Low`, matching common model-checker practice.
    Undefined,
}

/// A parsed and-gate: `lhs = rhs0 & rhs1`.
#[derive(Copy, Clone, Debug)]
pub struct AndLine {
    pub lhs: u32,
    pub rhs0: u32,
    pub rhs1: u32,
}

/// The raw contents of an AIGER file, prior to building the CNF transition relation.
#[derive(Debug)]
pub struct RawAiger {
    pub header: Header,
    pub latches: Vec<LatchLine>,
    pub outputs: Vec<u32>,
    pub and_gates: Vec<AndLine>,
}

/// Parses the ASCII AIGER (`aag`) format.
pub fn parse(input: &str) -> Result<RawAiger, AigerError> {
    let mut lines = input.lines().enumerate();

    let (header_line_no, header_line) = lines.next().ok_or(AigerError::MissingHeader {
        line: 1,
        found: String::new(),
    })?;

    let header = parse_header(header_line_no + 1, header_line)?;

    let remaining: Vec<(usize, &str)> = lines.collect();
    let mut cursor = 0usize;

    let mut take_line = |cursor: &mut usize, expected: usize| -> Result<(usize, &str), AigerError> {
        match remaining.get(*cursor) {
            Some(&(no, text)) => {
                *cursor += 1;
                Ok((no, text))
            }
            None => Err(AigerError::UnexpectedEof { expected }),
        }
    };

    for _ in 0..header.num_inputs {
        let (line_no, text) = take_line(&mut cursor, header.num_inputs as usize)?;
        parse_u32(line_no + 1, text)?;
    }

    let mut latches = Vec::with_capacity(header.num_latches as usize);
    for _ in 0..header.num_latches {
        let (line_no, text) = take_line(&mut cursor, header.num_latches as usize)?;
        let mut fields = text.split_ascii_whitespace();
        let lit = parse_field_u32(line_no + 1, fields.next(), text)?;
        let next = parse_field_u32(line_no + 1, fields.next(), text)?;
        let reset = match fields.next() {
            None => Reset::Low,
            Some(field) => {
                let value = field
                    .parse::<u32>()
                    .map_err(|_| AigerError::ExpectedLiteral {
                        line: line_no + 1,
                        found: text.to_string(),
                    })?;
                if value == 0 {
                    Reset::Low
                } else if value == 1 {
                    Reset::High
                } else {
                    Reset::Undefined
                }
            }
        };
        latches.push(LatchLine { lit, next, reset });
    }

    let mut outputs = Vec::with_capacity(header.num_outputs as usize);
    for _ in 0..header.num_outputs {
        let (line_no, text) = take_line(&mut cursor, header.num_outputs as usize)?;
        outputs.push(parse_u32(line_no + 1, text)?);
    }

    let mut and_gates = Vec::with_capacity(header.num_and_gates as usize);
    for _ in 0..header.num_and_gates {
        let (line_no, text) = take_line(&mut cursor, header.num_and_gates as usize)?;
        let mut fields = text.split_ascii_whitespace();
        let lhs = parse_field_u32(line_no + 1, fields.next(), text)?;
        let rhs0 = parse_field_u32(line_no + 1, fields.next(), text)?;
        let rhs1 = parse_field_u32(line_no + 1, fields.next(), text)?;
        and_gates.push(AndLine { lhs, rhs0, rhs1 });
    }

    // The remainder of the file is an optional symbol table and comment section; neither affects
    // the transition relation, so it is not parsed.

    Ok(RawAiger {
        header,
        latches,
        outputs,
        and_gates,
    })
}

fn parse_header(line_no: usize, line: &str) -> Result<Header, AigerError> {
    let mut fields = line.split_ascii_whitespace();
    let tag = fields.next().ok_or(AigerError::MissingHeader {
        line: line_no,
        found: line.to_string(),
    })?;

    if tag != "aag" {
        return Err(AigerError::UnsupportedFormat {
            tag: tag.to_string(),
        });
    }

    let mut next_field = || -> Result<u32, AigerError> {
        fields
            .next()
            .ok_or_else(|| AigerError::InvalidHeader {
                line: line_no,
                header: line.to_string(),
            })
            .and_then(|field| {
                field.parse::<u32>().map_err(|_| AigerError::InvalidHeader {
                    line: line_no,
                    header: line.to_string(),
                })
            })
    };

    Ok(Header {
        max_var: next_field()?,
        num_inputs: next_field()?,
        num_latches: next_field()?,
        num_outputs: next_field()?,
        num_and_gates: next_field()?,
    })
}

fn parse_u32(line_no: usize, text: &str) -> Result<u32, AigerError> {
    text.trim()
        .parse::<u32>()
        .map_err(|_| AigerError::ExpectedLiteral {
            line: line_no,
            found: text.to_string(),
        })
}

fn parse_field_u32(line_no: usize, field: Option<&str>, whole_line: &str) -> Result<u32, AigerError> {
    field
        .ok_or_else(|| AigerError::ExpectedLiteral {
            line: line_no,
            found: whole_line.to_string(),
        })
        .and_then(|field| {
            field.parse::<u32>().map_err(|_| AigerError::ExpectedLiteral {
                line: line_no,
                found: whole_line.to_string(),
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_trivial_circuit() {
        // One latch held at 0 forever: aag 1 0 1 1 0
        // latch: lit=2 next=2 (self-loop, i.e. stays at its own value)
        // output: 2 (the latch)
        let text = "aag 2 0 1 1 0\n2 2\n2\n";
        let raw = parse(text).unwrap();
        assert_eq!(raw.header.num_latches, 1);
        assert_eq!(raw.latches[0].lit, 2);
        assert_eq!(raw.latches[0].next, 2);
        assert_eq!(raw.outputs, vec![2]);
    }

    #[test]
    fn rejects_binary_format() {
        let err = parse("aig 2 0 1 1 0\n").unwrap_err();
        assert!(matches!(err, AigerError::UnsupportedFormat { .. }));
    }
}
