// Recording stub driver shared by the integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use custom_db_scripts::{Connection, ConnectionOptions, Driver, DriverError, QueryResult};

type Responder = dyn Fn(&str, &[&str]) -> Result<QueryResult, DriverError> + Send + Sync;

#[derive(Debug, Default)]
struct Calls {
    options: Vec<ConnectionOptions>,
    opened: usize,
    closed: usize,
    statements: Vec<(String, Vec<String>)>,
}

/// Driver whose statements are answered by a closure, counting every
/// connection open/close and capturing each statement.
#[derive(Clone)]
pub struct StubDriver {
    calls: Arc<Mutex<Calls>>,
    responder: Arc<Responder>,
    connect_error: Option<String>,
    close_error: Option<String>,
}

impl StubDriver {
    pub fn answering<F>(responder: F) -> Self
    where
        F: Fn(&str, &[&str]) -> Result<QueryResult, DriverError> + Send + Sync + 'static,
    {
        Self {
            calls: Arc::new(Mutex::new(Calls::default())),
            responder: Arc::new(responder),
            connect_error: None,
            close_error: None,
        }
    }

    pub fn rows(result: QueryResult) -> Self {
        Self::answering(move |_, _| Ok(result.clone()))
    }

    pub fn failing_query(message: &str) -> Self {
        let message = message.to_string();
        Self::answering(move |_, _| Err(DriverError::new(message.clone())))
    }

    pub fn failing_connect(message: &str) -> Self {
        let mut driver = Self::rows(QueryResult::default());
        driver.connect_error = Some(message.to_string());
        driver
    }

    pub fn failing_close(mut self, message: &str) -> Self {
        self.close_error = Some(message.to_string());
        self
    }

    pub fn opened(&self) -> usize {
        self.calls.lock().unwrap().opened
    }

    pub fn closed(&self) -> usize {
        self.calls.lock().unwrap().closed
    }

    pub fn options(&self) -> Vec<ConnectionOptions> {
        self.calls.lock().unwrap().options.clone()
    }

    pub fn statements(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().unwrap().statements.clone()
    }
}

#[async_trait]
impl Driver for StubDriver {
    async fn get_connection(
        &self,
        options: &ConnectionOptions,
    ) -> Result<Box<dyn Connection>, DriverError> {
        self.calls.lock().unwrap().options.push(options.clone());
        if let Some(message) = &self.connect_error {
            return Err(DriverError::new(message.clone()));
        }

        self.calls.lock().unwrap().opened += 1;
        Ok(Box::new(StubConnection {
            driver: self.clone(),
        }))
    }
}

struct StubConnection {
    driver: StubDriver,
}

#[async_trait]
impl Connection for StubConnection {
    async fn execute(&mut self, query: &str, params: &[&str]) -> Result<QueryResult, DriverError> {
        self.driver.calls.lock().unwrap().statements.push((
            query.to_string(),
            params.iter().map(|p| p.to_string()).collect(),
        ));
        (self.driver.responder)(query, params)
    }

    async fn close(self: Box<Self>) -> Result<(), DriverError> {
        self.driver.calls.lock().unwrap().closed += 1;
        match &self.driver.close_error {
            Some(message) => Err(DriverError::new(message.clone())),
            None => Ok(()),
        }
    }
}

pub fn options() -> ConnectionOptions {
    ConnectionOptions {
        user: "dbUser".into(),
        password: "dbUserPassword".into(),
        connect_string: "CONNECTION_STRING".into(),
    }
}
