pub mod database;
pub mod directory;
pub mod filter;
pub mod jwt;
pub mod report;
pub mod scope;

pub use database::Database;
pub use directory::{Directory, PgDirectory};
pub use filter::{institution_filter, InstitutionFilter};
pub use jwt::{AccessTokenClaims, JwtService};
pub use scope::{select_active_institution, PreferredInstitution};
