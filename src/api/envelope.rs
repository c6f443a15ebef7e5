use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// `{ "success": true, "message"?, "data"? }` plus any cookies to set.
#[derive(Debug)]
pub struct ApiSuccess<T = ()> {
    status: StatusCode,
    message: Option<&'static str>,
    data: Option<T>,
    cookies: Vec<HeaderValue>,
}

#[derive(Serialize)]
struct SuccessBody<'a, T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a T>,
}

impl ApiSuccess<()> {
    pub fn message(message: &'static str) -> Self {
        Self {
            status: StatusCode::OK,
            message: Some(message),
            data: None,
            cookies: Vec::new(),
        }
    }
}

impl<T: Serialize> ApiSuccess<T> {
    pub fn data(data: T) -> Self {
        Self {
            status: StatusCode::OK,
            message: None,
            data: Some(data),
            cookies: Vec::new(),
        }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }

    pub fn with_cookies(mut self, cookies: Vec<HeaderValue>) -> Self {
        self.cookies = cookies;
        self
    }
}

impl<T: Serialize> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        let body = SuccessBody {
            success: true,
            message: self.message,
            data: self.data.as_ref(),
        };

        let mut response = (self.status, Json(body)).into_response();
        let headers = response.headers_mut();
        for cookie in self.cookies {
            headers.append(header::SET_COOKIE, cookie);
        }
        response
    }
}
