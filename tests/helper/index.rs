//! Fake package index served by mockito

use mockito::{Matcher, Mock, Server, ServerGuard};
use quick_xml::escape::escape;
use regex::escape as regex_escape;
use serde_json::{Map, Value, json};

/// One release of a fake project
#[derive(Debug, Clone)]
pub struct Release {
    version: String,
    yanked: bool,
    uploaded: Option<String>,
    info: Map<String, Value>,
}

impl Release {
    pub fn new(version: &str) -> Self {
        Self {
            version: version.to_string(),
            yanked: false,
            uploaded: None,
            info: Map::new(),
        }
    }

    pub fn yanked(mut self) -> Self {
        self.yanked = true;
        self
    }

    pub fn uploaded(mut self, timestamp: &str) -> Self {
        self.uploaded = Some(timestamp.to_string());
        self
    }

    /// Extra fields for the release's info block
    pub fn info(mut self, fields: Value) -> Self {
        if let Value::Object(fields) = fields {
            self.info.extend(fields);
        }
        self
    }

    fn files(&self, project: &str) -> Value {
        match &self.uploaded {
            Some(ts) => json!([{
                "filename": format!("{project}-{}.tar.gz", self.version),
                "packagetype": "sdist",
                "python_version": "source",
                "size": 1024,
                "path": "ab/cd/ef",
                "downloads": -1,
                "url": format!("https://files.example.com/{project}-{}.tar.gz", self.version),
                "upload_time_iso_8601": ts,
            }]),
            None => json!([]),
        }
    }

    fn info_block(&self, project: &str) -> Value {
        let mut info = Map::new();
        info.insert("name".into(), json!(project));
        info.insert("version".into(), json!(self.version));
        info.insert("yanked".into(), json!(self.yanked));
        info.insert(
            "release_url".into(),
            json!(format!("https://pypi.org/project/{project}/{}/", self.version)),
        );
        info.extend(self.info.clone());
        Value::Object(info)
    }
}

/// mockito server answering the JSON API and XML-RPC like an index
pub struct FakeIndex {
    server: ServerGuard,
    mocks: Vec<Mock>,
}

impl FakeIndex {
    pub async fn start() -> Self {
        Self {
            server: Server::new_async().await,
            mocks: Vec::new(),
        }
    }

    pub fn index_url(&self) -> String {
        format!("{}/pypi", self.server.url())
    }

    /// Serve `releases` of `name` with the last one as the default version
    pub async fn project(&mut self, name: &str, releases: &[Release]) -> &mut Self {
        let Some(default) = releases.last() else {
            return self.missing(name).await;
        };

        let listing: Map<String, Value> = releases
            .iter()
            .map(|r| (r.version.clone(), r.files(name)))
            .collect();
        let payload = json!({
            "info": default.info_block(name),
            "urls": default.files(name),
            "releases": listing,
            "vulnerabilities": [],
        });
        self.get(&format!("/pypi/{name}/json"), 200, payload.to_string())
            .await;

        for release in releases {
            let body = json!({
                "info": release.info_block(name),
                "urls": release.files(name),
                "vulnerabilities": [],
            });
            self.get(
                &format!("/pypi/{name}/{}/json", release.version),
                200,
                body.to_string(),
            )
            .await;
        }
        self
    }

    /// Answer 404 for `name` and any of its versions
    pub async fn missing(&mut self, name: &str) -> &mut Self {
        let mock = self
            .server
            .mock("GET", Matcher::Regex(format!(r"^/pypi/{name}/(.+/)?json$")))
            .with_status(404)
            .with_body("Nope.")
            .create_async()
            .await;
        self.mocks.push(mock);
        self
    }

    /// Answer XML-RPC calls to `method` with `result`
    pub async fn rpc(&mut self, method: &str, result: Value) -> &mut Self {
        let body = format!(
            "<?xml version='1.0'?>\n<methodResponse>\n<params>\n<param>\n{}\n</param>\n</params>\n</methodResponse>\n",
            rpc_value(&result)
        );
        let mock = self
            .server
            .mock("POST", "/pypi")
            .match_body(Matcher::Regex(format!("<methodName>{method}</methodName>")))
            .with_status(200)
            .with_header("content-type", "text/xml")
            .with_body(body)
            .create_async()
            .await;
        self.mocks.push(mock);
        self
    }

    /// Answer XML-RPC calls to `method` whose body contains `param` with `result`
    pub async fn rpc_with(&mut self, method: &str, param: &str, result: Value) -> &mut Self {
        let body = format!(
            "<?xml version='1.0'?>\n<methodResponse>\n<params>\n<param>\n{}\n</param>\n</params>\n</methodResponse>\n",
            rpc_value(&result)
        );
        let mock = self
            .server
            .mock("POST", "/pypi")
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(format!("<methodName>{method}</methodName>")),
                Matcher::Regex(format!("<string>{}</string>", regex_escape(param))),
            ]))
            .with_status(200)
            .with_header("content-type", "text/xml")
            .with_body(body)
            .create_async()
            .await;
        self.mocks.push(mock);
        self
    }

    /// Answer XML-RPC calls to `method` with a fault
    pub async fn rpc_fault(&mut self, method: &str, param: &str, message: &str) -> &mut Self {
        let body = format!(
            "<?xml version='1.0'?>\n<methodResponse><fault><value><struct>\
             <member><name>faultCode</name><value><int>1</int></value></member>\
             <member><name>faultString</name><value><string>{message}</string></value></member>\
             </struct></value></fault></methodResponse>"
        );
        let mock = self
            .server
            .mock("POST", "/pypi")
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(format!("<methodName>{method}</methodName>")),
                Matcher::Regex(format!("<string>{}</string>", regex_escape(param))),
            ]))
            .with_status(200)
            .with_body(body)
            .create_async()
            .await;
        self.mocks.push(mock);
        self
    }

    /// Expect exactly one XML-RPC call whose body matches every pattern
    pub async fn expect_rpc_body(&mut self, patterns: &[&str], result: Value) -> Mock {
        let body = format!(
            "<?xml version='1.0'?>\n<methodResponse><params><param>{}</param></params></methodResponse>",
            rpc_value(&result)
        );
        self.server
            .mock("POST", "/pypi")
            .match_body(Matcher::AllOf(
                patterns
                    .iter()
                    .map(|p| Matcher::Regex(regex_escape(p)))
                    .collect(),
            ))
            .with_status(200)
            .with_body(body)
            .expect(1)
            .create_async()
            .await
    }

    async fn get(&mut self, path: &str, status: usize, body: String) {
        let mock = self
            .server
            .mock("GET", path)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;
        self.mocks.push(mock);
    }
}

/// XML-RPC `<value>` for a JSON value, as a Python server would write it
fn rpc_value(value: &Value) -> String {
    let inner = match value {
        Value::Null => "<nil/>".to_string(),
        Value::Bool(b) => format!("<boolean>{}</boolean>", u8::from(*b)),
        Value::Number(n) if n.is_i64() => format!("<int>{n}</int>"),
        Value::Number(n) => format!("<double>{n}</double>"),
        Value::String(s) => format!("<string>{}</string>", escape(s)),
        Value::Array(items) => format!(
            "<array><data>{}</data></array>",
            items.iter().map(rpc_value).collect::<String>()
        ),
        Value::Object(members) => format!(
            "<struct>{}</struct>",
            members
                .iter()
                .map(|(k, v)| format!("<member><name>{}</name>{}</member>", escape(k), rpc_value(v)))
                .collect::<String>()
        ),
    };
    format!("<value>{inner}</value>")
}
