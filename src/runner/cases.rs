use reqwest::Method;

use crate::client::Auth;

/// Request body a case sends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Payload {
    Empty,
    Credentials,
    Draw,
    NewCard,
}

/// Every contract case the runner knows how to execute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Case {
    CardsAnonymous,
    Signup,
    Signin,
    AuthUser,
    CardsAuthenticated,
    SaveDraw,
    ListDraws,
    AdminListCards,
    AdminCreateCard,
    AuthUserUnauthorized,
    SaveDrawUnauthorized,
    ListDrawsUnauthorized,
    AdminListCardsUnauthorized,
    AdminCreateCardUnauthorized,
}

/// Cases run before the branch is chosen. Signin decides the branch.
pub const PREAMBLE: [Case; 3] = [Case::CardsAnonymous, Case::Signup, Case::Signin];

pub const AUTHENTICATED: [Case; 6] = [
    Case::AuthUser,
    Case::CardsAuthenticated,
    Case::SaveDraw,
    Case::ListDraws,
    Case::AdminListCards,
    Case::AdminCreateCard,
];

pub const UNAUTHORIZED: [Case; 5] = [
    Case::AuthUserUnauthorized,
    Case::SaveDrawUnauthorized,
    Case::ListDrawsUnauthorized,
    Case::AdminListCardsUnauthorized,
    Case::AdminCreateCardUnauthorized,
];

impl Case {
    pub fn name(self) -> &'static str {
        match self {
            Case::CardsAnonymous => "GET /api/cards (unauthenticated)",
            Case::Signup => "POST /api/auth/signup",
            Case::Signin => "POST /api/auth/signin",
            Case::AuthUser => "GET /api/auth/user",
            Case::CardsAuthenticated => "GET /api/cards (authenticated)",
            Case::SaveDraw => "POST /api/draws/save",
            Case::ListDraws => "GET /api/draws",
            Case::AdminListCards => "GET /api/admin/cards",
            Case::AdminCreateCard => "POST /api/admin/cards",
            Case::AuthUserUnauthorized => "GET /api/auth/user (unauthorized)",
            Case::SaveDrawUnauthorized => "POST /api/draws/save (unauthorized)",
            Case::ListDrawsUnauthorized => "GET /api/draws (unauthorized)",
            Case::AdminListCardsUnauthorized => "GET /api/admin/cards (unauthorized)",
            Case::AdminCreateCardUnauthorized => "POST /api/admin/cards (unauthorized)",
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Case::CardsAnonymous | Case::CardsAuthenticated => "/cards",
            Case::Signup => "/auth/signup",
            Case::Signin => "/auth/signin",
            Case::AuthUser | Case::AuthUserUnauthorized => "/auth/user",
            Case::SaveDraw | Case::SaveDrawUnauthorized => "/draws/save",
            Case::ListDraws | Case::ListDrawsUnauthorized => "/draws",
            Case::AdminListCards
            | Case::AdminListCardsUnauthorized
            | Case::AdminCreateCard
            | Case::AdminCreateCardUnauthorized => "/admin/cards",
        }
    }

    pub fn payload(self) -> Payload {
        match self {
            Case::Signup | Case::Signin => Payload::Credentials,
            Case::SaveDraw | Case::SaveDrawUnauthorized => Payload::Draw,
            Case::AdminCreateCard | Case::AdminCreateCardUnauthorized => Payload::NewCard,
            _ => Payload::Empty,
        }
    }

    pub fn method(self) -> Method {
        match self.payload() {
            Payload::Empty => Method::GET,
            _ => Method::POST,
        }
    }

    /// Signup, signin and the anonymous card listing never carry the session;
    /// neither do the unauthorized probes.
    pub fn auth(self) -> Auth {
        match self {
            Case::AuthUser
            | Case::CardsAuthenticated
            | Case::SaveDraw
            | Case::ListDraws
            | Case::AdminListCards
            | Case::AdminCreateCard => Auth::Session,
            _ => Auth::Anonymous,
        }
    }
}

#[cfg(test)]
#[path = "../tests/runner/cases_tests.rs"]
mod tests;
