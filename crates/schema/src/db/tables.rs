//! Compile-time–checked column identifiers for all tables.

use sea_query::Iden;

#[derive(Iden, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Users {
    Table,
    Id,
    Name,
    Email,
    EmailVerified,
    Image,
    CreatedAt,
    UpdatedAt,
    StripeCustomerId,
    Role,
    Banned,
    BanReason,
    BanExpires,
}

#[derive(Iden, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sessions {
    Table,
    Id,
    ExpiresAt,
    Token,
    CreatedAt,
    UpdatedAt,
    IpAddress,
    UserAgent,
    UserId,
    ImpersonatedBy,
}

#[derive(Iden, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Accounts {
    Table,
    Id,
    AccountId,
    ProviderId,
    UserId,
    AccessToken,
    RefreshToken,
    IdToken,
    AccessTokenExpiresAt,
    RefreshTokenExpiresAt,
    Scope,
    Password,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verifications {
    Table,
    Id,
    Identifier,
    Value,
    ExpiresAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Subscriptions {
    Table,
    Id,
    Plan,
    ReferenceId,
    StripeCustomerId,
    StripeSubscriptionId,
    Status,
    PeriodStart,
    PeriodEnd,
    CancelAtPeriodEnd,
    Seats,
}

/// Column order used by every `SELECT` on `users`; row decoders rely on it.
pub const USER_COLUMNS: [Users; 12] = [
    Users::Id,
    Users::Name,
    Users::Email,
    Users::EmailVerified,
    Users::Image,
    Users::CreatedAt,
    Users::UpdatedAt,
    Users::StripeCustomerId,
    Users::Role,
    Users::Banned,
    Users::BanReason,
    Users::BanExpires,
];

pub const SESSION_COLUMNS: [Sessions; 9] = [
    Sessions::Id,
    Sessions::ExpiresAt,
    Sessions::Token,
    Sessions::CreatedAt,
    Sessions::UpdatedAt,
    Sessions::IpAddress,
    Sessions::UserAgent,
    Sessions::UserId,
    Sessions::ImpersonatedBy,
];

pub const ACCOUNT_COLUMNS: [Accounts; 13] = [
    Accounts::Id,
    Accounts::AccountId,
    Accounts::ProviderId,
    Accounts::UserId,
    Accounts::AccessToken,
    Accounts::RefreshToken,
    Accounts::IdToken,
    Accounts::AccessTokenExpiresAt,
    Accounts::RefreshTokenExpiresAt,
    Accounts::Scope,
    Accounts::Password,
    Accounts::CreatedAt,
    Accounts::UpdatedAt,
];

pub const VERIFICATION_COLUMNS: [Verifications; 6] = [
    Verifications::Id,
    Verifications::Identifier,
    Verifications::Value,
    Verifications::ExpiresAt,
    Verifications::CreatedAt,
    Verifications::UpdatedAt,
];

pub const SUBSCRIPTION_COLUMNS: [Subscriptions; 10] = [
    Subscriptions::Id,
    Subscriptions::Plan,
    Subscriptions::ReferenceId,
    Subscriptions::StripeCustomerId,
    Subscriptions::StripeSubscriptionId,
    Subscriptions::Status,
    Subscriptions::PeriodStart,
    Subscriptions::PeriodEnd,
    Subscriptions::CancelAtPeriodEnd,
    Subscriptions::Seats,
];
