//! JUnit report reading — collect the test-case names a run reported
//!
//! Only presence matters: the `name` of every `<testcase>` is collected,
//! whether it passed, failed, errored or was skipped.
//!
//! ```xml
//! <testsuites>
//!   <testsuite name="users">
//!     <testcase name="users_id_get_basic_access" classname="api"/>
//!     <testcase name="users_id_id_valid_input">
//!       <failure message="500"/>
//!     </testcase>
//!   </testsuite>
//! </testsuites>
//! ```
//!
//! A bare `<testsuite>` root is accepted too. Malformed XML or any other
//! root element is an error.

use crate::error::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

const TESTSUITES: &[u8] = b"testsuites";
const TESTSUITE: &[u8] = b"testsuite";
const TESTCASE: &[u8] = b"testcase";

/// A test case found in a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedTestCase {
    pub name: String,
}

/// All test cases found in a report, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestReport {
    pub cases: Vec<ObservedTestCase>,
}

impl TestReport {
    /// Reported test-case names in document order (duplicates kept)
    pub fn names(&self) -> Vec<String> {
        self.cases.iter().map(|c| c.name.clone()).collect()
    }
}

/// Read and parse a JUnit XML file
pub fn load_test_report(path: &Path) -> Result<TestReport> {
    let xml = std::fs::read_to_string(path).map_err(|e| Error::read(path, e))?;
    let report = parse_test_report(&xml)?;
    info!(path = %path.display(), cases = report.cases.len(), "test report loaded");
    Ok(report)
}

/// Parse JUnit XML text
pub fn parse_test_report(xml: &str) -> Result<TestReport> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut report = TestReport::default();
    let mut depth = 0usize;
    let mut root_seen = false;

    loop {
        let event = reader.read_event().map_err(|e| {
            Error::ReportParse(format!("at byte {}: {}", reader.buffer_position(), e))
        })?;

        match event {
            Event::Start(e) => {
                check_root(&e, &mut root_seen, depth)?;
                visit(&e, &mut report)?;
                depth += 1;
            }
            Event::Empty(e) => {
                check_root(&e, &mut root_seen, depth)?;
                visit(&e, &mut report)?;
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !root_seen {
        return Err(Error::ReportParse("document has no root element".to_string()));
    }
    if depth != 0 {
        return Err(Error::ReportParse("unexpected end of document".to_string()));
    }
    Ok(report)
}

fn check_root(e: &BytesStart<'_>, root_seen: &mut bool, depth: usize) -> Result<()> {
    if depth > 0 {
        return Ok(());
    }
    if *root_seen {
        return Err(Error::ReportParse("multiple root elements".to_string()));
    }
    *root_seen = true;

    let name = e.name();
    if name.as_ref() != TESTSUITES && name.as_ref() != TESTSUITE {
        return Err(Error::ReportParse(format!(
            "unexpected root element <{}>",
            String::from_utf8_lossy(name.as_ref())
        )));
    }
    Ok(())
}

fn visit(e: &BytesStart<'_>, report: &mut TestReport) -> Result<()> {
    if e.name().as_ref() != TESTCASE {
        return Ok(());
    }

    let name = attribute(e, "name")?
        .ok_or_else(|| Error::ReportParse("<testcase> without a name attribute".to_string()))?;
    report.cases.push(ObservedTestCase { name });
    Ok(())
}

fn attribute(e: &BytesStart<'_>, key: &str) -> Result<Option<String>> {
    let attr = e
        .try_get_attribute(key)
        .map_err(|err| Error::ReportParse(err.to_string()))?;
    attr.map(|a| {
        a.unescape_value()
            .map(|v| v.into_owned())
            .map_err(|err| Error::ReportParse(err.to_string()))
    })
    .transpose()
}
