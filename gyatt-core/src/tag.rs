use gyatt_object::{Kvlm, Object, Tag};
use gyatt_ref::RefTree;
use gyatt_repository::Repository;

use crate::{CommandOutput, Error};

/// Fixed identity used for the `tagger` header of annotated tags this core
/// creates; there is no author/signing configuration to draw one from.
const TAGGER: &str = "gyatt <gyatt@gyatt.com>";

/// Create a tag named `name` pointing at `object`. A lightweight tag is just
/// a direct ref; an annotated tag wraps the target in a tag object first.
pub fn tag_create(repo: &Repository, name: &str, object: &str, annotate: bool) -> Result<CommandOutput, Error> {
    let target_oid = gyatt_revision::find(repo.gitdir(), object, None, true)?;

    if annotate {
        let target_kind = repo
            .store()
            .read(&target_oid)?
            .ok_or(Error::ObjectNotFound(target_oid))?
            .kind();

        let mut kvlm = Kvlm::default();
        kvlm.push("object", target_oid.to_hex());
        kvlm.push("type", target_kind.to_string());
        kvlm.push("tag", name);
        kvlm.push("tagger", TAGGER);
        kvlm.message = "A tag generated by gyatt".into();

        let tag_oid = repo.store().write(&Object::Tag(Tag(kvlm)), true)?;
        gyatt_ref::create(repo.gitdir(), &format!("tags/{name}"), &tag_oid)?;
    } else {
        gyatt_ref::create(repo.gitdir(), &format!("tags/{name}"), &target_oid)?;
    }
    Ok(CommandOutput::Lines(Vec::new()))
}

/// List every tag name under `refs/tags`.
pub fn tag_list(repo: &Repository) -> Result<CommandOutput, Error> {
    let tree = gyatt_ref::list(repo.gitdir(), "refs/tags")?;
    let mut lines = Vec::new();
    collect_names(&tree, "", &mut lines);
    Ok(CommandOutput::Lines(lines))
}

fn collect_names(node: &RefTree, prefix: &str, lines: &mut Vec<String>) {
    match node {
        RefTree::Leaf(_) => lines.push(prefix.to_string()),
        RefTree::Node(children) => {
            for (name, child) in children {
                let child_prefix = if prefix.is_empty() {
                    name.clone()
                } else {
                    format!("{prefix}/{name}")
                };
                collect_names(child, &child_prefix, lines);
            }
        }
    }
}
