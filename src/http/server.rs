//! `may_minihttp` adapter for the router.

use std::io::{self, Read};

use may_minihttp::{HttpService, Request, Response};

use super::router::{handle, reason_phrase};
#[cfg(feature = "tracing")]
use crate::metrics::tracing_helpers;
use crate::service::UserService;

/// One instance is cloned per connection
#[derive(Clone)]
pub struct UserHttpService {
    service: UserService,
}

impl UserHttpService {
    pub fn new(service: UserService) -> Self {
        Self { service }
    }
}

impl HttpService for UserHttpService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        let method = req.method().to_string();
        let path = req.path().to_string();

        #[cfg(feature = "tracing")]
        let _span = tracing_helpers::request_span(&method, &path).entered();

        let mut body = Vec::new();
        req.body().read_to_end(&mut body)?;

        let response = handle(&self.service, &method, &path, &body);
        log::debug!("{} {} -> {}", method, path, response.status);

        res.status_code(usize::from(response.status), reason_phrase(response.status));
        res.header(response.content_type);
        res.body_vec(response.body);
        Ok(())
    }
}
