/* src/server/engine/rust/src/escape.rs */

/// Encode a JSON value as a literal that is safe to place inside an inline
/// `<script>` element.
///
/// The output is still valid JSON: parsing it yields a value equal to the
/// input. Only characters inside string literals are rewritten, since
/// serde_json never emits them outside strings.
pub fn script_literal(value: &serde_json::Value) -> Result<String, serde_json::Error> {
  let json = serde_json::to_string(value)?;
  Ok(escape_json_for_script(&json))
}

/// Rewrite HTML-sensitive and non-ASCII characters in JSON string values as
/// `\uXXXX` escapes.
///
/// `<`, `>` and `/` are escaped so that `</script>` and `<!--` can never
/// appear in the emitted text. `&` is escaped for XHTML parsers. Every
/// non-ASCII codepoint (U+2028 and U+2029 included) is escaped, with chars
/// outside the BMP written as surrogate pairs.
pub fn escape_json_for_script(json: &str) -> String {
  let mut out = String::with_capacity(json.len());
  let mut in_string = false;
  let mut chars = json.chars();

  while let Some(ch) = chars.next() {
    if !in_string {
      if ch == '"' {
        in_string = true;
      }
      out.push(ch);
      continue;
    }

    match ch {
      '\\' => {
        // Existing escape: copy it through untouched
        out.push(ch);
        if let Some(next) = chars.next() {
          out.push(next);
        }
      }
      '"' => {
        in_string = false;
        out.push(ch);
      }
      '<' | '>' | '/' | '&' => push_unicode_escape(&mut out, ch as u32),
      c if (c as u32) > 0x7F => {
        let code = c as u32;
        if code > 0xFFFF {
          let adjusted = code - 0x1_0000;
          push_unicode_escape(&mut out, (adjusted >> 10) + 0xD800);
          push_unicode_escape(&mut out, (adjusted & 0x3FF) + 0xDC00);
        } else {
          push_unicode_escape(&mut out, code);
        }
      }
      c => out.push(c),
    }
  }
  out
}

fn push_unicode_escape(out: &mut String, code: u32) {
  out.push_str(&format!("\\u{code:04x}"));
}

#[cfg(test)]
mod tests {
  use super::*;
  use proptest::prelude::*;
  use serde_json::json;

  #[test]
  fn ascii_passthrough() {
    let input = r#"{"key":"hello","n":[1,2.5,null,true]}"#;
    assert_eq!(escape_json_for_script(input), input);
  }

  #[test]
  fn closes_no_script_element() {
    let value = json!({"html": "</script><script>alert(1)</script>"});
    let literal = script_literal(&value).unwrap();
    assert!(!literal.contains("</script"));
    assert!(!literal.contains('<'));
    assert_eq!(serde_json::from_str::<serde_json::Value>(&literal).unwrap(), value);
  }

  #[test]
  fn escapes_comment_openers() {
    let literal = script_literal(&json!("<!-- hi -->")).unwrap();
    assert_eq!(literal, r#""\u003c!-- hi --\u003e""#);
  }

  #[test]
  fn escapes_line_separators() {
    let literal = script_literal(&json!("a\u{2028}b\u{2029}c")).unwrap();
    assert_eq!(literal, r#""a\u2028b\u2029c""#);
  }

  #[test]
  fn escapes_cjk_in_values() {
    let literal = script_literal(&json!({"msg": "你好"})).unwrap();
    assert_eq!(literal, r#"{"msg":"\u4f60\u597d"}"#);
  }

  #[test]
  fn surrogate_pair_for_emoji() {
    let literal = script_literal(&json!({"emoji": "😀"})).unwrap();
    assert_eq!(literal, r#"{"emoji":"\ud83d\ude00"}"#);
  }

  #[test]
  fn preserves_existing_escapes() {
    let input = r#"{"a":"say \"hi\"","b":"line\nbreak","c":"back\\slash"}"#;
    assert_eq!(escape_json_for_script(input), input);
  }

  #[test]
  fn escapes_keys_as_well_as_values() {
    let value = json!({"</b>": 1});
    let literal = script_literal(&value).unwrap();
    assert_eq!(literal, r#"{"\u003c\u002fb\u003e":1}"#);
    assert_eq!(serde_json::from_str::<serde_json::Value>(&literal).unwrap(), value);
  }

  fn arb_json() -> impl Strategy<Value = serde_json::Value> {
    let leaf = prop_oneof![
      Just(serde_json::Value::Null),
      any::<bool>().prop_map(serde_json::Value::Bool),
      any::<i64>().prop_map(|n| json!(n)),
      ".*".prop_map(serde_json::Value::String),
      prop::sample::select(vec!["</script>", "<!--", "\"'", "\u{2028}", "&amp;", "\\"])
        .prop_map(|s| serde_json::Value::String(s.to_string())),
    ];
    leaf.prop_recursive(4, 64, 8, |inner| {
      prop_oneof![
        prop::collection::vec(inner.clone(), 0..8).prop_map(serde_json::Value::Array),
        prop::collection::btree_map(".*", inner, 0..8)
          .prop_map(|m| serde_json::Value::Object(m.into_iter().collect())),
      ]
    })
  }

  proptest! {
    #[test]
    fn literal_round_trips(value in arb_json()) {
      let literal = script_literal(&value).unwrap();
      prop_assert!(literal.is_ascii());
      prop_assert!(!literal.contains("</"));
      let parsed: serde_json::Value = serde_json::from_str(&literal).unwrap();
      prop_assert_eq!(parsed, value);
    }
  }
}
