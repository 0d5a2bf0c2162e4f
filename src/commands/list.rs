//! List and page command handlers.

use crate::args::ListArgs;
use crate::commands::Out;
use crate::session::{ResourceKind, Session};
use crate::Result;

/// Applies the filter in `args` to its resource and renders the resulting page.
pub fn list(session: &mut Session, args: &ListArgs) -> Result<Out<()>> {
    let rendered = session.list(args.resource(), args.filter(), args.page())?;
    Ok(rendered.into())
}

/// Moves a resource table to `page` and renders it.
pub fn page(session: &mut Session, resource: ResourceKind, page: usize) -> Out<()> {
    session.goto_page(resource, page).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::FilterArgs;
    use crate::test::session;

    #[test]
    fn test_list_expenses() {
        let mut s = session();
        let args = ListArgs::new(
            ResourceKind::Expense,
            FilterArgs::default().with_status("approved"),
            None,
        );
        let out = list(&mut s, &args).unwrap();
        assert!(out.message().contains("Pembelian ATK Kantor"));
        assert!(out.message().contains("Maintenance Komputer"));
        assert!(!out.message().contains("Biaya Listrik"));
        assert!(out.message().ends_with("Page 1 of 1 (2 records)"));
    }

    #[test]
    fn test_list_bad_filter() {
        let mut s = session();
        let args = ListArgs::new(
            ResourceKind::PreOrder,
            FilterArgs::default().with_category("office"),
            None,
        );
        assert!(list(&mut s, &args).is_err());
    }

    #[test]
    fn test_page_clamps() {
        let mut s = session();
        let out = page(&mut s, ResourceKind::DeliveryNote, 0);
        assert!(out.message().starts_with("Manage Surat Jalan"));
        assert!(out.message().ends_with("Page 1 of 1 (2 records)"));
    }
}
