//! Delete command handler.

use crate::args::DeleteArgs;
use crate::commands::Out;
use crate::page::Confirm;
use crate::session::{DeletePolicy, Session};
use crate::Result;
use serde_json::Value;

/// Deletes one record. Unless `--yes` is given or confirmation is turned off in the config,
/// `confirm` is asked first; declining leaves the record in place.
pub fn delete(
    session: &mut Session,
    args: &DeleteArgs,
    confirm: &mut dyn Confirm,
) -> Result<Out<Value>> {
    let policy = if args.yes() {
        DeletePolicy::Skip
    } else {
        DeletePolicy::Ask
    };
    let resource = args.resource();
    let id = args.id();
    match session.delete(resource, id, policy, confirm)? {
        Some(record) => Ok(Out::new(
            format!("Deleted {} {id}", resource.noun()),
            record,
        )),
        None => Ok("Delete cancelled".into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::ResourceKind;
    use crate::store::Store;
    use crate::test::session;

    #[test]
    fn test_delete_confirmed() {
        let mut s = session();
        let args = DeleteArgs::new(ResourceKind::DeliveryNote, 2, false);
        let out = delete(&mut s, &args, &mut |_: &str| true).unwrap();
        assert_eq!(out.message(), "Deleted surat jalan 2");
        assert_eq!(out.structure().unwrap()["number"], "SJ-2024-002");
        assert_eq!(s.delivery_notes().store().list().len(), 1);
    }

    #[test]
    fn test_delete_declined() {
        let mut s = session();
        let args = DeleteArgs::new(ResourceKind::Expense, 1, false);
        let out = delete(&mut s, &args, &mut |_: &str| false).unwrap();
        assert_eq!(out.message(), "Delete cancelled");
        assert!(out.structure().is_none());
        assert_eq!(s.expenses().store().list().len(), 3);
    }

    #[test]
    fn test_delete_yes_skips_prompt() {
        let mut s = session();
        let args = DeleteArgs::new(ResourceKind::Expense, 3, true);
        let out = delete(&mut s, &args, &mut |_: &str| false).unwrap();
        assert_eq!(out.message(), "Deleted expense 3");
    }

    #[test]
    fn test_delete_missing() {
        let mut s = session();
        let args = DeleteArgs::new(ResourceKind::PreOrder, 42, true);
        let err = delete(&mut s, &args, &mut |_: &str| true).unwrap_err();
        assert!(err.is_warning());
        assert_eq!(err.to_string(), "preorder 42 not found");
    }
}
