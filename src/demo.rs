//! Demo token minting.
//!
//! Account management is an external collaborator, so local development
//! needs a way to obtain signed tokens for the three roles. The endpoint is
//! gated behind `auth.demo_tokens` and answers not-found when disabled, so
//! a production deployment does not even reveal it exists.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth;
use crate::error::{Error, Result};
use crate::module::Module;
use crate::principal::Role;
use crate::response::{self, HttpResponse};
use crate::router::{Context, Router};

#[derive(Debug, Deserialize)]
struct TokenRequest {
    #[serde(default)]
    subject: Option<Uuid>,
    role: Role,
}

#[derive(Debug, Serialize)]
struct TokenResponse {
    token: String,
    subject: Uuid,
    role: Role,
}

async fn mint(ctx: Context) -> Result<HttpResponse> {
    if !ctx.config.auth.demo_tokens {
        return Err(Error::NotFound("endpoint".into()));
    }

    let input: TokenRequest = ctx.json()?;
    let subject = input.subject.unwrap_or_else(Uuid::new_v4);
    let token = auth::create_token(&ctx.config.auth, subject, input.role)?;

    response::ok(&TokenResponse {
        token,
        subject,
        role: input.role,
    })
}

/// Registers the demo token endpoint.
pub struct DemoTokenModule;

impl Module for DemoTokenModule {
    fn name(&self) -> &'static str {
        "demo-tokens"
    }

    fn routes(&self, router: &mut Router) {
        router.post("/api/auth/token", |ctx| mint(ctx));
    }
}
