//! XML-RPC client for the legacy index API
//!
//! Calls are encoded from and decoded into `serde_json::Value` so callers can
//! deserialize results with serde like any other response.
//!
//! | XML-RPC                 | JSON                       |
//! |-------------------------|----------------------------|
//! | `int`, `i4`, `i8`       | number                     |
//! | `double`                | number                     |
//! | `boolean`               | bool                       |
//! | `string`, untyped       | string                     |
//! | `dateTime.iso8601`      | string                     |
//! | `base64`                | string (still encoded)     |
//! | `array`                 | array                      |
//! | `struct`                | object                     |
//! | `nil`                   | null                       |

use async_trait::async_trait;
use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use reqwest::Client;
use serde_json::{Map, Number, Value};
use tracing::{debug, warn};

use crate::config::IndexConfig;
use crate::index::registry::RpcTransport;
use crate::version::error::{QypiError, TransportError};

/// XML-RPC client posting to the index root
pub struct XmlRpcClient {
    client: Client,
    url: String,
}

impl XmlRpcClient {
    pub fn new(config: &IndexConfig) -> Result<Self, QypiError> {
        Ok(Self::with_client(config.http_client()?, config))
    }

    pub fn with_client(client: Client, config: &IndexConfig) -> Self {
        Self {
            client,
            url: config.rpc_url().to_string(),
        }
    }
}

#[async_trait]
impl RpcTransport for XmlRpcClient {
    async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, QypiError> {
        debug!("XML-RPC call {} to {}", method, self.url);

        let response = self
            .client
            .post(&self.url)
            .header("Content-Type", "text/xml")
            .body(encode_call(method, &params))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("XML-RPC endpoint returned status {}: {}", status, self.url);
            return Err(TransportError::Status {
                status: status.as_u16(),
                url: self.url.clone(),
            }
            .into());
        }

        let body = response.text().await?;
        Ok(decode_response(&body)?)
    }
}

/// Encode a `methodCall` document
pub fn encode_call(method: &str, params: &[Value]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\"?>\n<methodCall>\n<methodName>");
    xml.push_str(&escape(method));
    xml.push_str("</methodName>\n<params>\n");
    for param in params {
        xml.push_str("<param>");
        encode_value(&mut xml, param);
        xml.push_str("</param>\n");
    }
    xml.push_str("</params>\n</methodCall>\n");
    xml
}

fn encode_value(out: &mut String, value: &Value) {
    out.push_str("<value>");
    match value {
        Value::Null => out.push_str("<nil/>"),
        Value::Bool(b) => {
            out.push_str("<boolean>");
            out.push(if *b { '1' } else { '0' });
            out.push_str("</boolean>");
        }
        Value::Number(n) => match n.as_i64() {
            Some(i) => out.push_str(&format!("<int>{i}</int>")),
            None => out.push_str(&format!("<double>{n}</double>")),
        },
        Value::String(s) => {
            out.push_str("<string>");
            out.push_str(&escape(s.as_str()));
            out.push_str("</string>");
        }
        Value::Array(items) => {
            out.push_str("<array><data>");
            for item in items {
                encode_value(out, item);
            }
            out.push_str("</data></array>");
        }
        Value::Object(members) => {
            out.push_str("<struct>");
            for (name, member) in members {
                out.push_str("<member><name>");
                out.push_str(&escape(name.as_str()));
                out.push_str("</name>");
                encode_value(out, member);
                out.push_str("</member>");
            }
            out.push_str("</struct>");
        }
    }
    out.push_str("</value>");
}

/// Decode a `methodResponse` document into its single return value
pub fn decode_response(xml: &str) -> Result<Value, TransportError> {
    let root = parse_document(xml)?;
    if root.name != "methodResponse" {
        return Err(invalid(format!("expected methodResponse, found <{}>", root.name)));
    }

    if let Some(fault) = root.child("fault") {
        let value = decode_value(fault.child("value").ok_or_else(|| invalid("fault without value"))?)?;
        let code = value.get("faultCode").and_then(Value::as_i64).unwrap_or_default();
        let message = value
            .get("faultString")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        return Err(TransportError::Fault { code, message });
    }

    let value = root
        .child("params")
        .and_then(|params| params.child("param"))
        .and_then(|param| param.child("value"))
        .ok_or_else(|| invalid("response without a return value"))?;
    decode_value(value)
}

fn invalid(message: impl Into<String>) -> TransportError {
    TransportError::InvalidResponse(format!("XML-RPC: {}", message.into()))
}

#[derive(Debug, Default)]
struct Node {
    name: String,
    text: String,
    children: Vec<Node>,
}

impl Node {
    fn named(start: &BytesStart<'_>) -> Self {
        Self {
            name: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
            ..Self::default()
        }
    }

    fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.name == name)
    }
}

fn parse_document(xml: &str) -> Result<Node, TransportError> {
    // Text is kept verbatim. Whitespace between elements lands on container
    // nodes, which decode from their children and never read it.
    let mut reader = Reader::from_str(xml);

    // The bottom of the stack is a synthetic document node.
    let mut stack = vec![Node::default()];
    loop {
        let event = reader.read_event().map_err(|e| invalid(e.to_string()))?;
        match event {
            Event::Start(start) => stack.push(Node::named(&start)),
            Event::Empty(start) => {
                let node = Node::named(&start);
                current(&mut stack)?.children.push(node);
            }
            Event::End(_) => {
                let node = stack.pop().ok_or_else(|| invalid("unbalanced closing tag"))?;
                current(&mut stack)?.children.push(node);
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(|e| invalid(e.to_string()))?;
                current(&mut stack)?.text.push_str(&text);
            }
            Event::CData(data) => {
                let text = String::from_utf8_lossy(&data).into_owned();
                current(&mut stack)?.text.push_str(&text);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let mut document = stack.pop().ok_or_else(|| invalid("empty document"))?;
    if !stack.is_empty() {
        return Err(invalid("unclosed element"));
    }
    document.children.pop().ok_or_else(|| invalid("empty document"))
}

fn current(stack: &mut [Node]) -> Result<&mut Node, TransportError> {
    stack.last_mut().ok_or_else(|| invalid("unbalanced closing tag"))
}

fn decode_value(value: &Node) -> Result<Value, TransportError> {
    let Some(typed) = value.children.first() else {
        return Ok(Value::String(value.text.clone()));
    };

    match typed.name.as_str() {
        "int" | "i4" | "i8" => typed
            .text
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|e| invalid(format!("bad integer '{}': {}", typed.text, e))),
        "double" => typed
            .text
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| invalid(format!("bad double '{}'", typed.text))),
        "boolean" => match typed.text.trim() {
            "1" => Ok(Value::Bool(true)),
            "0" => Ok(Value::Bool(false)),
            other => Err(invalid(format!("bad boolean '{other}'"))),
        },
        "string" | "dateTime.iso8601" | "base64" => Ok(Value::String(typed.text.clone())),
        "nil" => Ok(Value::Null),
        "array" => {
            let data = typed.child("data").ok_or_else(|| invalid("array without data"))?;
            data.children
                .iter()
                .filter(|c| c.name == "value")
                .map(decode_value)
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }
        "struct" => {
            let mut members = Map::new();
            for member in typed.children.iter().filter(|c| c.name == "member") {
                let name = member.child("name").ok_or_else(|| invalid("member without name"))?;
                let value = member.child("value").ok_or_else(|| invalid("member without value"))?;
                members.insert(name.text.clone(), decode_value(value)?);
            }
            Ok(Value::Object(members))
        }
        other => Err(invalid(format!("unsupported type <{other}>"))),
    }
}
