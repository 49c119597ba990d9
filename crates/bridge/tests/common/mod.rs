#![allow(dead_code)]

use std::{cell::RefCell, rc::Rc};

use scriptbox_bridge::{Bridge, Config, Host};

/// How the test host answers `host.call`.
#[derive(Debug, Clone)]
pub enum Reply {
    Echo,
    Bytes(Vec<u8>),
    Code(i32),
}

/// Host that records every request and log line and answers with a
/// scripted reply.
#[derive(Debug)]
pub struct RecordingHost {
    reply: Reply,
    requests: RefCell<Vec<Vec<u8>>>,
    logs: RefCell<Vec<Vec<u8>>>,
}

impl RecordingHost {
    pub const fn new(reply: Reply) -> Self {
        Self {
            reply,
            requests: RefCell::new(Vec::new()),
            logs: RefCell::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<Vec<u8>> {
        self.requests.borrow().clone()
    }

    pub fn logs(&self) -> Vec<String> {
        self.logs
            .borrow()
            .iter()
            .map(|line| String::from_utf8_lossy(line).into_owned())
            .collect()
    }
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self::new(Reply::Echo)
    }
}

impl Host for RecordingHost {
    fn call(&self, request: &[u8], response: &mut [u8]) -> i32 {
        self.requests.borrow_mut().push(request.to_vec());
        let reply = match &self.reply {
            Reply::Echo => request,
            Reply::Bytes(bytes) => bytes.as_slice(),
            Reply::Code(code) => return *code,
        };
        let n = reply.len().min(response.len());
        response[..n].copy_from_slice(&reply[..n]);
        i32::try_from(n).expect("reply fits in i32")
    }

    fn log(&self, message: &[u8]) {
        self.logs.borrow_mut().push(message.to_vec());
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

pub fn bridge(reply: Reply) -> Bridge<RecordingHost> {
    init_tracing();
    Bridge::new(RecordingHost::new(reply))
}

pub fn bridge_with_config(reply: Reply, config: Config) -> Bridge<RecordingHost> {
    init_tracing();
    Bridge::with_config(RecordingHost::new(reply), config)
}

pub fn shared_host(reply: Reply) -> Rc<RecordingHost> {
    init_tracing();
    Rc::new(RecordingHost::new(reply))
}
