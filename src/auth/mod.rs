pub mod claims;
pub mod identity_provider;
pub mod jwt;
pub mod middleware;
pub mod roles;

pub use claims::{AuthContext, Claims};
pub use identity_provider::{IdentityProviderClient, TokenResponse};
pub use jwt::JwtVerifier;
pub use middleware::{AuthMiddleware, AuthenticatedUser};
pub use roles::{RequireRoles, ROLE_ADMIN, ROLE_TEACHER};
