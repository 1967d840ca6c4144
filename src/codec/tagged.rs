//! Tagged-element form of [`Data`]
//!
//! Every variant is written as an element with a fixed tag:
//!
//! ```text
//! <null/>
//! <bool>true</bool>
//! <byte>1</byte> <short>1</short> <int>1</int> <long>1</long>
//! <float>1.5</float> <double>1.5</double>
//! <string>text</string>
//! <list><int>1</int><string>a</string></list>
//! <map><entry key="k"><bool>false</bool></entry></map>
//! ```
//!
//! Unlike JSON this form keeps numeric widths, so `decode(encode(d)) == d`
//! for every `Data` nested no deeper than [`MAX_DEPTH`], non-finite floats
//! included.

use crate::model::{Data, Number};
use crate::{Error, Result};
use std::collections::BTreeMap;

const TAG_NULL: &str = "null";
const TAG_BOOL: &str = "bool";
const TAG_STRING: &str = "string";
const TAG_LIST: &str = "list";
const TAG_MAP: &str = "map";
const TAG_ENTRY: &str = "entry";
const ATTR_KEY: &str = "key";

/// Deepest list/map nesting `decode` accepts, the same cap serde_json uses
pub const MAX_DEPTH: usize = 128;

/// Encode a value in the tagged form
pub fn encode(data: &Data) -> String {
    let mut out = String::new();
    write_element(&mut out, data);
    out
}

/// Decode a value from the tagged form
pub fn decode(text: &str) -> Result<Data> {
    let mut parser = Parser {
        src: text,
        pos: 0,
        depth: 0,
    };
    let data = parser.element()?;
    parser.skip_ws();
    if parser.pos != text.len() {
        return Err(parser.error("trailing input after root element"));
    }
    Ok(data)
}

fn write_element(out: &mut String, data: &Data) {
    match data {
        Data::Null => out.push_str("<null/>"),
        Data::Bool(b) => write_scalar(out, TAG_BOOL, &b.to_string()),
        Data::Number(n) => write_scalar(out, n.type_name(), &n.to_string()),
        Data::Text(s) => write_scalar(out, TAG_STRING, &escape(s)),
        Data::List(items) => {
            out.push_str("<list>");
            for item in items {
                write_element(out, item);
            }
            out.push_str("</list>");
        }
        Data::Map(map) => {
            out.push_str("<map>");
            for (key, value) in map {
                out.push_str("<entry key=\"");
                out.push_str(&escape(key));
                out.push_str("\">");
                write_element(out, value);
                out.push_str("</entry>");
            }
            out.push_str("</map>");
        }
    }
}

fn write_scalar(out: &mut String, tag: &str, body: &str) {
    out.push('<');
    out.push_str(tag);
    out.push('>');
    out.push_str(body);
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn unescape(s: &str) -> Result<String> {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp + 1..];
        let semi = tail
            .find(';')
            .ok_or_else(|| Error::translation(format!("unterminated entity in {s:?}")))?;
        let entity = &tail[..semi];
        let c = match entity {
            "amp" => '&',
            "lt" => '<',
            "gt" => '>',
            "quot" => '"',
            "apos" => '\'',
            _ => {
                let code = if let Some(hex) = entity.strip_prefix("#x") {
                    u32::from_str_radix(hex, 16).ok()
                } else if let Some(dec) = entity.strip_prefix('#') {
                    dec.parse().ok()
                } else {
                    None
                };
                code.and_then(char::from_u32)
                    .ok_or_else(|| Error::translation(format!("unknown entity &{entity};")))?
            }
        };
        out.push(c);
        rest = &tail[semi + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    /// Open list and map elements
    depth: usize,
}

struct OpenTag<'a> {
    name: &'a str,
    key: Option<String>,
    self_closing: bool,
}

impl<'a> Parser<'a> {
    fn error(&self, msg: &str) -> Error {
        Error::translation(format!("{msg} at offset {}", self.pos))
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn skip_ws(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &str) -> Result<()> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(self.error(&format!("expected {token:?}")))
        }
    }

    fn name(&mut self) -> Result<&'a str> {
        let rest = self.rest();
        let len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
            .unwrap_or(rest.len());
        if len == 0 {
            return Err(self.error("expected a name"));
        }
        self.pos += len;
        Ok(&rest[..len])
    }

    fn open_tag(&mut self) -> Result<OpenTag<'a>> {
        self.skip_ws();
        self.expect("<")?;
        let name = self.name()?;
        let mut key = None;
        loop {
            self.skip_ws();
            if self.eat("/>") {
                return Ok(OpenTag { name, key, self_closing: true });
            }
            if self.eat(">") {
                return Ok(OpenTag { name, key, self_closing: false });
            }
            let attr = self.name()?;
            if attr != ATTR_KEY || name != TAG_ENTRY || key.is_some() {
                return Err(self.error(&format!("unexpected attribute {attr:?} on <{name}>")));
            }
            self.skip_ws();
            self.expect("=")?;
            self.skip_ws();
            self.expect("\"")?;
            let rest = self.rest();
            let end = rest
                .find('"')
                .ok_or_else(|| self.error("unterminated attribute value"))?;
            key = Some(unescape(&rest[..end])?);
            self.pos += end + 1;
        }
    }

    fn close_tag(&mut self, name: &str) -> Result<()> {
        self.skip_ws();
        self.expect("</")?;
        let found = self.name()?;
        if found != name {
            return Err(self.error(&format!("mismatched closing tag </{found}> for <{name}>")));
        }
        self.skip_ws();
        self.expect(">")
    }

    /// Raw character data up to the next `<`, unescaped
    fn text(&mut self) -> Result<String> {
        let rest = self.rest();
        let end = rest.find('<').unwrap_or(rest.len());
        self.pos += end;
        unescape(&rest[..end])
    }

    fn descend(&mut self) -> Result<()> {
        if self.depth == MAX_DEPTH {
            return Err(self.error(&format!("nesting deeper than {MAX_DEPTH}")));
        }
        self.depth += 1;
        Ok(())
    }

    fn at_close(&mut self) -> bool {
        self.skip_ws();
        self.rest().starts_with("</")
    }

    fn element(&mut self) -> Result<Data> {
        let tag = self.open_tag()?;
        match tag.name {
            TAG_NULL => {
                if !tag.self_closing {
                    self.close_tag(TAG_NULL)?;
                }
                Ok(Data::Null)
            }
            TAG_STRING => {
                if tag.self_closing {
                    return Ok(Data::Text(String::new()));
                }
                let text = self.text()?;
                self.close_tag(TAG_STRING)?;
                Ok(Data::Text(text))
            }
            TAG_LIST => {
                let mut items = Vec::new();
                if !tag.self_closing {
                    self.descend()?;
                    while !self.at_close() {
                        items.push(self.element()?);
                    }
                    self.close_tag(TAG_LIST)?;
                    self.depth -= 1;
                }
                Ok(Data::List(items))
            }
            TAG_MAP => {
                let mut map = BTreeMap::new();
                if !tag.self_closing {
                    self.descend()?;
                    while !self.at_close() {
                        let (key, value) = self.entry()?;
                        map.insert(key, value);
                    }
                    self.close_tag(TAG_MAP)?;
                    self.depth -= 1;
                }
                Ok(Data::Map(map))
            }
            name => {
                if tag.self_closing {
                    return Err(self.error(&format!("<{name}/> has no content")));
                }
                let text = self.text()?;
                self.close_tag(name)?;
                parse_scalar(name, text.trim())
            }
        }
    }

    fn entry(&mut self) -> Result<(String, Data)> {
        let tag = self.open_tag()?;
        if tag.name != TAG_ENTRY {
            return Err(self.error(&format!("expected <entry>, found <{}>", tag.name)));
        }
        let key = tag
            .key
            .ok_or_else(|| self.error("<entry> is missing its key attribute"))?;
        if tag.self_closing {
            return Err(self.error("<entry/> has no value"));
        }
        let value = self.element()?;
        self.close_tag(TAG_ENTRY)?;
        Ok((key, value))
    }
}

fn parse_scalar(tag: &str, text: &str) -> Result<Data> {
    fn num<T: std::str::FromStr>(tag: &str, text: &str) -> Result<T> {
        text.parse()
            .map_err(|_| Error::translation(format!("{text:?} is not a valid <{tag}>")))
    }

    let data = match tag {
        TAG_BOOL => Data::Bool(num(tag, text)?),
        "byte" => Data::Number(Number::Byte(num(tag, text)?)),
        "short" => Data::Number(Number::Short(num(tag, text)?)),
        "int" => Data::Number(Number::Int(num(tag, text)?)),
        "long" => Data::Number(Number::Long(num(tag, text)?)),
        "float" => Data::Number(Number::Float(num(tag, text)?)),
        "double" => Data::Number(Number::Double(num(tag, text)?)),
        other => return Err(Error::translation(format!("unknown tag <{other}>"))),
    };
    Ok(data)
}
