//! Operations outside the [`Storage`](crate::Storage) interface, reachable
//! by name through [`Filesystem::call`](crate::Filesystem::call).
use std::fmt::Debug;

use async_trait::async_trait;
use serde_json::Value;

use crate::{drive, item, Context, Error};

/// A named operation on a [`Context`].
#[async_trait]
pub trait Plugin: Debug + Send + Sync {
    /// Name the plugin is called by.
    fn method(&self) -> &'static str;

    /// Run the operation.
    async fn handle(&self, ctx: &mut Context, args: &[Value]) -> crate::Result<Value>;
}

/// Check the arity of a call and borrow its arguments as strings.
fn string_args<'a, const N: usize>(method: &str, args: &'a [Value]) -> crate::Result<[&'a str; N]> {
    if args.len() != N {
        return Err(Error::InvalidArguments {
            method: method.into(),
            expected: N,
            got: args.len(),
        });
    }

    let mut out = [""; N];

    for (index, (slot, arg)) in out.iter_mut().zip(args).enumerate() {
        *slot = arg.as_str().ok_or_else(|| Error::ArgumentNotString {
            method: method.into(),
            index,
        })?;
    }

    Ok(out)
}

/// `getUrl(path)`: web url of an item, or `null`.
#[derive(Debug, Clone, Copy)]
pub struct GetUrl;

#[async_trait]
impl Plugin for GetUrl {
    fn method(&self) -> &'static str {
        "getUrl"
    }

    async fn handle(&self, ctx: &mut Context, args: &[Value]) -> crate::Result<Value> {
        let [path] = string_args(self.method(), args)?;

        Ok(item::url(ctx, path).await?.map_or(Value::Null, Value::String))
    }
}

/// `createDrive(name)`: create a document library, returning its list.
#[derive(Debug, Clone, Copy)]
pub struct CreateDrive;

#[async_trait]
impl Plugin for CreateDrive {
    fn method(&self) -> &'static str {
        "createDrive"
    }

    async fn handle(&self, ctx: &mut Context, args: &[Value]) -> crate::Result<Value> {
        let [name] = string_args(self.method(), args)?;

        let list = drive::create(ctx, name).await?;

        Ok(serde_json::to_value(list).map_err(graph_fs::Error::from)?)
    }
}

/// `deleteDrive(name)`: permanently delete a document library.
#[derive(Debug, Clone, Copy)]
pub struct DeleteDrive;

#[async_trait]
impl Plugin for DeleteDrive {
    fn method(&self) -> &'static str {
        "deleteDrive"
    }

    async fn handle(&self, ctx: &mut Context, args: &[Value]) -> crate::Result<Value> {
        let [name] = string_args(self.method(), args)?;

        drive::delete(ctx, name).await?;

        Ok(Value::Bool(true))
    }
}

/// `inviteUser(path, principal)`: grant read and write access, returning
/// the permissions or `false` if there is no such item.
#[derive(Debug, Clone, Copy)]
pub struct InviteUser;

#[async_trait]
impl Plugin for InviteUser {
    fn method(&self) -> &'static str {
        "inviteUser"
    }

    async fn handle(&self, ctx: &mut Context, args: &[Value]) -> crate::Result<Value> {
        let [path, principal] = string_args(self.method(), args)?;

        match item::invite_user(ctx, path, principal).await? {
            Some(permissions) => {
                Ok(serde_json::to_value(permissions).map_err(graph_fs::Error::from)?)
            }
            None => Ok(Value::Bool(false)),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::string_args;
    use crate::Error;

    #[test]
    fn arity_is_checked() {
        let err = string_args::<2>("inviteUser", &[json!("a")]).unwrap_err();

        assert!(matches!(
            err,
            Error::InvalidArguments { expected: 2, got: 1, .. }
        ));
    }

    #[test]
    fn arguments_must_be_strings() {
        let err = string_args::<2>("inviteUser", &[json!("a"), json!(3)]).unwrap_err();

        assert!(matches!(err, Error::ArgumentNotString { index: 1, .. }));
    }

    #[test]
    fn arguments_are_borrowed_in_order() {
        let args = [json!("docs/a.txt"), json!("ann@contoso.com")];

        assert_eq!(
            string_args::<2>("inviteUser", &args).unwrap(),
            ["docs/a.txt", "ann@contoso.com"]
        );
    }
}
