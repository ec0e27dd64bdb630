pub mod insert;
pub mod select;

use core::str::FromStr;

use std::io::Write;

use diesel::{
    backend::Backend,
    deserialize::{self, FromSql, FromSqlRow},
    expression::AsExpression,
    pg::Pg,
    serialize::{self, IsNull, Output, ToSql},
};
use loan_signing_domain::{
    contract::ContractStatus as DomainContractStatus,
    signature::{SignatureStatus as DomainSignatureStatus, SignerType as DomainSignerType},
};

use crate::persistence::schema::sql_types::{
    ContractStatus as ContractStatusSql, SignatureStatus as SignatureStatusSql,
    SignerType as SignerTypeSql,
};

#[derive(Debug, Clone, Copy, AsExpression, FromSqlRow)]
#[diesel(sql_type = SignerTypeSql)]
pub struct SignerType(DomainSignerType);

#[derive(Debug, Clone, Copy, AsExpression, FromSqlRow)]
#[diesel(sql_type = SignatureStatusSql)]
pub struct SignatureStatus(DomainSignatureStatus);

#[derive(Debug, Clone, Copy, AsExpression, FromSqlRow)]
#[diesel(sql_type = ContractStatusSql)]
pub struct ContractStatus(DomainContractStatus);

/// Maps a domain enum onto a postgres enum through its snake_case variant names.
macro_rules! pg_enum {
    ($wrapper:ident, $domain:ty, $sql:ty, $what:literal) => {
        impl $wrapper {
            pub fn into_inner(self) -> $domain {
                self.0
            }
        }

        impl From<$domain> for $wrapper {
            fn from(value: $domain) -> Self {
                Self(value)
            }
        }

        impl ToSql<$sql, Pg> for $wrapper {
            fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
                out.write_all(<&str>::from(self.0).as_bytes())?;

                Ok(IsNull::No)
            }
        }

        impl FromSql<$sql, Pg> for $wrapper {
            fn from_sql(bz: <Pg as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
                str::from_utf8(bz.as_bytes())
                    .map(<$domain>::from_str)?
                    .map(Self)
                    .map_err(|_| concat!("unrecognized enum variant for ", $what).into())
            }
        }
    };
}

pg_enum!(SignerType, DomainSignerType, SignerTypeSql, "signer type");
pg_enum!(SignatureStatus, DomainSignatureStatus, SignatureStatusSql, "signature status");
pg_enum!(ContractStatus, DomainContractStatus, ContractStatusSql, "contract status");
