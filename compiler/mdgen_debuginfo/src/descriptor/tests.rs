use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;
use crate::arena::{MdRef, MetadataArena};
use crate::config::DebugInfoConfig;
use crate::dwarf::{tag_value, DIFlags, DwarfLang, DwarfTypeEncoding};
use crate::node::IntWidth;

fn lowered(set: &DescriptorSet<MdRef>, id: DescId) -> (MetadataArena, MdRef) {
    let arena = MetadataArena::new();
    let node = Lowering::new(&arena, set).lower(id);
    (arena, node)
}

fn strings(arena: &MetadataArena, node: MdRef) -> Vec<String> {
    arena
        .fields(node)
        .unwrap()
        .into_iter()
        .map(|f| arena.string(f).unwrap())
        .collect()
}

// -- Type descriptors --

#[test]
fn basic_type_field_order() {
    let mut set = DescriptorSet::new();
    let file = set.add(FileDescriptor::new("main.x"));
    let int = set.add(
        BasicTypeDescriptor::new("int", 32, DwarfTypeEncoding::Signed).with_file(Some(file), 5),
    );

    let (arena, node) = lowered(&set, int);

    assert_eq!(arena.fields(node).unwrap().len(), 10);
    assert_eq!(
        arena.field(node, 0).and_then(MdRef::as_int),
        Some(u64::from((12 << 16) + 0x24_u32))
    );
    assert_eq!(
        arena.render(),
        "!0 = metadata !{metadata !\"main.x\", metadata !\"\"}\n\
         !1 = metadata !{i32 786468, metadata !0, null, metadata !\"int\", i32 5, i64 32, i64 32, i64 0, i32 0, i32 5}\n"
    );
}

#[test]
fn basic_type_flags_and_layout() {
    let mut set = DescriptorSet::new();
    let id = set.add(
        BasicTypeDescriptor::new("f64", 64, DwarfTypeEncoding::Float)
            .with_layout(64, 32, 8)
            .with_flags(DIFlags::ARTIFICIAL | DIFlags::PRIVATE),
    );

    let (arena, node) = lowered(&set, id);
    let ints: Vec<_> = arena
        .fields(node)
        .unwrap()
        .into_iter()
        .map(MdRef::as_int)
        .collect();

    assert_eq!(ints[5..], [Some(64), Some(32), Some(8), Some(0x41), Some(4)]);
    assert_eq!(arena.field(node, 5).and_then(MdRef::int_width), Some(IntWidth::I64));
    assert_eq!(arena.field(node, 8).and_then(MdRef::int_width), Some(IntWidth::I32));
}

#[test]
fn subroutine_members_are_result_then_params() {
    let mut set = DescriptorSet::new();
    let int = set.add(BasicTypeDescriptor::new("int", 32, DwarfTypeEncoding::Signed));
    let sig = set.add(CompositeTypeDescriptor::subroutine(Some(int), &[Some(int), None]));

    assert_eq!(set[sig].tag(), DwarfTag::SubroutineType);

    let (arena, _) = lowered(&set, sig);
    assert_eq!(
        arena.render(),
        "!0 = metadata !{i32 786468, null, null, metadata !\"int\", i32 0, i64 32, i64 32, i64 0, i32 0, i32 5}\n\
         !1 = metadata !{metadata !0, metadata !0, null}\n\
         !2 = metadata !{i32 786453, null, null, metadata !\"\", i32 0, i64 0, i64 0, i64 0, i32 0, null, metadata !1, i32 0, i32 0}\n"
    );
}

#[test]
fn void_subroutine_keeps_absent_result() {
    let sig = CompositeTypeDescriptor::subroutine(None, &[]);
    assert_eq!(sig.members, vec![None]);
}

#[test]
fn structure_with_members() {
    let mut set = DescriptorSet::new();
    let int = set.add(BasicTypeDescriptor::new("int", 32, DwarfTypeEncoding::Signed));
    let a = set.add(DerivedTypeDescriptor::member("a", Some(int)).with_layout(32, 32, 0));
    let b = set.add(DerivedTypeDescriptor::member("b", Some(int)).with_layout(32, 32, 32));
    let pair = set.add(
        CompositeTypeDescriptor::structure("pair", vec![Some(a), Some(b)]).with_layout(64, 32, 0),
    );

    assert_eq!(set[a].tag(), DwarfTag::Member);
    assert_eq!(set[pair].tag(), DwarfTag::StructureType);

    let (arena, node) = lowered(&set, pair);
    let fields = arena.fields(node).unwrap();
    assert_eq!(fields.len(), 13);
    assert_eq!(fields[0].as_int(), Some(tag_value(DwarfTag::StructureType)));
    assert_eq!(arena.string(fields[3]).as_deref(), Some("pair"));
    assert!(fields[9].is_null());
    let members = arena.fields(fields[10]).unwrap();
    assert_eq!(members.len(), 2);
    assert_eq!(arena.field(members[1], 7).and_then(MdRef::as_int), Some(32));
    assert_eq!(fields[11], arena.const_u32(0));
    assert_eq!(fields[12], arena.const_u32(0));
}

#[test]
fn derived_types_reference_their_base() {
    let mut set = DescriptorSet::new();
    let int = set.add(BasicTypeDescriptor::new("int", 32, DwarfTypeEncoding::Signed));
    let ptr = set.add(DerivedTypeDescriptor::pointer(Some(int), 64));
    let alias = set.add(DerivedTypeDescriptor::typedef("myint", Some(int)));
    let opaque = set.add(DerivedTypeDescriptor::pointer(None, 64));

    assert_eq!(set[ptr].tag(), DwarfTag::PointerType);
    assert_eq!(set[alias].tag(), DwarfTag::Typedef);

    let arena = MetadataArena::new();
    let mut cx = Lowering::new(&arena, &set);
    let int_node = cx.lower(int);
    let ptr_node = cx.lower(ptr);
    let alias_node = cx.lower(alias);
    let opaque_node = cx.lower(opaque);

    assert_eq!(arena.fields(ptr_node).unwrap().len(), 10);
    assert_eq!(arena.field(ptr_node, 5).and_then(MdRef::as_int), Some(64));
    assert_eq!(arena.field(ptr_node, 9), Some(int_node));
    assert_eq!(arena.field(alias_node, 9), Some(int_node));
    assert_eq!(arena.field(opaque_node, 9), Some(MdRef::Null));
}

// -- Program descriptors --

#[test]
fn compile_unit_fields() {
    let arena = MetadataArena::new();
    let mut set = DescriptorSet::new();
    let sp = set.add(SubprogramDescriptor::<MdRef>::new("main", "/src/main.x"));
    let config = DebugInfoConfig::release()
        .with_producer("mdgen test")
        .with_flags("-g")
        .with_language(DwarfLang::Go)
        .with_runtime_version(-1);
    let mut unit = CompileUnitDescriptor::from_config("/src/main.x", &config);
    unit.subprograms.push(Some(sp));
    let cu = set.add(unit);

    let node = Lowering::new(&arena, &set).lower(cu);
    let f = arena.fields(node).unwrap();

    assert_eq!(f.len(), 13);
    assert_eq!(f[0].as_int(), Some(tag_value(DwarfTag::CompileUnit)));
    assert_eq!(strings(&arena, f[1]), ["main.x", "/src"]);
    assert_eq!(f[2].as_int(), Some(0x16));
    assert_eq!(arena.string(f[3]).as_deref(), Some("mdgen test"));
    assert_eq!(f[4], arena.const_bool(true));
    assert_eq!(arena.string(f[5]).as_deref(), Some("-g"));
    assert_eq!(f[6], arena.const_all_ones(IntWidth::I32));
    let list_lens: Vec<_> = f[7..11]
        .iter()
        .map(|&list| arena.fields(list).unwrap().len())
        .collect();
    assert_eq!(list_lens, [0, 0, 1, 0]);
    assert_eq!(arena.fields(f[11]).unwrap().len(), 0);
    assert_eq!(arena.string(f[12]).as_deref(), Some(""));
}

#[test]
fn unoptimized_unit_has_zero_bit() {
    let mut set = DescriptorSet::new();
    let cu = set.add(CompileUnitDescriptor::new("a.x", DwarfLang::C99, "p"));

    let (arena, node) = lowered(&set, cu);
    assert_eq!(arena.field(node, 4), Some(arena.const_null(IntWidth::I1)));
    assert_eq!(arena.field(node, 6), Some(arena.const_u32(0)));
    assert_eq!(arena.field(node, 2).and_then(MdRef::as_int), Some(0x0c));
}

#[test]
fn compile_unit_file_is_not_interned() {
    let mut set = DescriptorSet::new();
    let file = set.add(FileDescriptor::new("/src/main.x"));
    let cu = set.add(CompileUnitDescriptor::new("/src/main.x", DwarfLang::C, "p"));

    let arena = MetadataArena::new();
    let mut cx = Lowering::new(&arena, &set);
    let file_node = cx.lower(file);
    let cu_node = cx.lower(cu);

    assert_ne!(arena.field(cu_node, 1), Some(file_node));
    assert_eq!(cx.cached_len(), 2);
}

#[test]
fn subprogram_fields() {
    let arena = MetadataArena::new();
    let main = arena.value("main");
    let mut set = DescriptorSet::new();
    let sig = set.add(CompositeTypeDescriptor::subroutine(None, &[]));
    let sp = set.add(
        SubprogramDescriptor::new("main", "/src/main.x")
            .with_display_name("main()")
            .with_type(Some(sig))
            .with_lines(3, 4)
            .with_function(main),
    );

    let node = Lowering::new(&arena, &set).lower(sp);
    let f = arena.fields(node).unwrap();

    assert_eq!(f.len(), 20);
    assert_eq!(f[0].as_int(), Some(tag_value(DwarfTag::Subprogram)));
    assert_eq!(strings(&arena, f[1]), ["main.x", "/src"]);
    assert!(f[2].is_null());
    assert_eq!(arena.string(f[3]).as_deref(), Some("main"));
    assert_eq!(arena.string(f[4]).as_deref(), Some("main()"));
    assert_eq!(arena.string(f[5]).as_deref(), Some(""));
    assert_eq!(f[6].as_int(), Some(3));
    assert!(f[7].as_node().is_some());
    assert_eq!(f[8], arena.const_bool(false));
    assert_eq!(f[9], arena.const_bool(true));
    assert_eq!(f[10], arena.const_null(IntWidth::I32));
    assert_eq!(f[11], arena.const_null(IntWidth::I32));
    assert!(f[12].is_null());
    assert_eq!(f[13].as_int(), Some(u64::from(DIFlags::PROTOTYPED.bits())));
    assert_eq!(f[14], arena.const_bool(false));
    assert_eq!(f[15], main);
    assert!(f[16].is_null());
    assert!(f[17].is_null());
    assert_eq!(arena.fields(f[18]).unwrap().len(), 0);
    assert_eq!(f[19].as_int(), Some(4));
}

#[test]
fn subprogram_without_function_has_null_slot() {
    let mut set = DescriptorSet::new();
    let sp = set.add(SubprogramDescriptor::new("decl", "a.x"));

    let (arena, node) = lowered(&set, sp);
    assert_eq!(arena.field(node, 15), Some(MdRef::Null));
    assert_eq!(arena.field(node, 4).and_then(|f| arena.string(f)).as_deref(), Some("decl"));
}

#[test]
fn global_variable_fields() {
    let arena = MetadataArena::new();
    let storage = arena.value("counter");
    let mut set = DescriptorSet::new();
    let file = set.add(FileDescriptor::new("/src/main.x"));
    let int = set.add(BasicTypeDescriptor::new("int", 32, DwarfTypeEncoding::Signed));
    let mut global = GlobalVariableDescriptor::new("counter")
        .with_file(Some(file), 7)
        .with_type(Some(int))
        .with_value(storage);
    global.local = true;
    let gv = set.add(global);

    let node = Lowering::new(&arena, &set).lower(gv);
    let f = arena.fields(node).unwrap();

    assert_eq!(f.len(), 12);
    assert_eq!(f[0].as_int(), Some(tag_value(DwarfTag::Variable)));
    assert_eq!(f[1], arena.const_null(IntWidth::I32));
    assert!(f[2].is_null());
    assert_eq!(arena.string(f[3]).as_deref(), Some("counter"));
    assert_eq!(arena.string(f[4]).as_deref(), Some("counter"));
    assert_eq!(arena.fields(f[5]).unwrap().len(), 0);
    assert_eq!(strings(&arena, f[6]), ["main.x", "/src"]);
    assert_eq!(f[7].as_int(), Some(7));
    assert!(f[8].as_node().is_some());
    assert_eq!(f[9], arena.const_bool(true));
    assert_eq!(f[10], arena.const_bool(true));
    assert_eq!(f[11], storage);
}

#[test]
fn external_global_is_not_a_definition() {
    let mut set = DescriptorSet::new();
    let mut global = GlobalVariableDescriptor::new("errno");
    global.external = true;
    let gv = set.add(global);

    let (arena, node) = lowered(&set, gv);
    assert_eq!(arena.field(node, 9), Some(arena.const_bool(false)));
    assert_eq!(arena.field(node, 10), Some(arena.const_bool(false)));
    assert_eq!(arena.field(node, 11), Some(MdRef::Null));
}

#[test]
fn local_variable_argument_encoding() {
    let mut set = DescriptorSet::new();
    let file = set.add(FileDescriptor::new("main.x"));
    let x = set.add(LocalVariableDescriptor::argument("x", 2).with_file(Some(file), 10));

    assert_eq!(set[x].tag(), DwarfTag::ArgVariable);

    let (arena, node) = lowered(&set, x);
    let f = arena.fields(node).unwrap();
    assert_eq!(f.len(), 8);
    assert_eq!(f[0].as_int(), Some(tag_value(DwarfTag::ArgVariable)));
    assert_eq!(f[4].as_int(), Some(10 | (2 << 24)));
    assert_eq!(f[6], arena.const_null(IntWidth::I32));
    assert_eq!(f[7], arena.const_null(IntWidth::I32));
}

#[test]
fn local_variable_constructors() {
    let auto = LocalVariableDescriptor::auto("tmp");
    assert_eq!(auto.tag(), DwarfTag::AutoVariable);
    assert_eq!(auto.argument, 0);

    let bare = LocalVariableDescriptor::new(DwarfTag::ArgVariable);
    assert_eq!(bare.name, "");
    assert_eq!(bare.encoded_line(), 0);
}

// -- Scopes --

#[test]
fn file_split() {
    assert_eq!(FileDescriptor::new("/a/b/c.x").split(), ("/a/b", "c.x"));
    assert_eq!(FileDescriptor::new("c.x").split(), ("", "c.x"));
    assert_eq!(FileDescriptor::new("/c.x").split(), ("", "c.x"));
    assert_eq!(FileDescriptor::new("dir/").split(), ("dir", ""));
    assert_eq!(FileDescriptor::new("").split(), ("", ""));
}

#[test]
fn file_node_is_filename_then_directory() {
    let arena = MetadataArena::new();
    let node = FileDescriptor::new("/a/b/c.x").lower(&arena);
    assert_eq!(strings(&arena, node), ["c.x", "/a/b"]);
}

#[test]
fn block_fields() {
    let mut set = DescriptorSet::new();
    let file = set.add(FileDescriptor::new("main.x"));
    let sp = set.add(SubprogramDescriptor::new("f", "main.x"));
    let block = set.add(BlockDescriptor::new(Some(file), Some(sp), 12, 3, 1));

    let (arena, node) = lowered(&set, block);
    let f = arena.fields(node).unwrap();
    assert_eq!(f.len(), 6);
    assert_eq!(f[0].as_int(), Some(tag_value(DwarfTag::LexicalBlock)));
    assert!(f[1].as_node().is_some());
    assert!(f[2].as_node().is_some());
    let tail: Vec<_> = f[3..].iter().map(|f| f.as_int()).collect();
    assert_eq!(tail, [Some(12), Some(3), Some(1)]);
}

#[test]
fn context_wraps_file_node() {
    let mut set = DescriptorSet::new();
    let ctx = set.add(ContextDescriptor::new("/src/lib.x"));

    assert_eq!(set[ctx].tag(), DwarfTag::FileType);

    let (arena, node) = lowered(&set, ctx);
    let f = arena.fields(node).unwrap();
    assert_eq!(f.len(), 2);
    assert_eq!(f[0].as_int(), Some(tag_value(DwarfTag::FileType)));
    assert_eq!(strings(&arena, f[1]), ["lib.x", "/src"]);
}

#[test]
#[should_panic(expected = "line descriptor")]
fn line_has_no_tag() {
    let mut set = DescriptorSet::<MdRef>::new();
    let line = set.add(LineDescriptor::new(1, 1, None));
    let _ = set[line].tag();
}

// -- Set --

#[test]
fn references_in_field_order() {
    let mut set = DescriptorSet::<MdRef>::new();
    let file = set.add(FileDescriptor::new("a.x"));
    let scope = set.add(ContextDescriptor::new("a.x"));
    let int = set.add(
        BasicTypeDescriptor::new("int", 32, DwarfTypeEncoding::Signed)
            .with_file(Some(file), 1)
            .with_context(Some(scope)),
    );
    let sig = set.add(CompositeTypeDescriptor::subroutine(None, &[Some(int), Some(int)]));

    assert_eq!(set[int].references(), [file, scope]);
    assert_eq!(set[sig].references(), [int, int]);
    assert!(set[file].references().is_empty());
}

#[test]
fn ids_follow_insertion_order() {
    let mut set = DescriptorSet::<MdRef>::new();
    assert!(set.is_empty());
    let a = set.add(FileDescriptor::new("a.x"));
    let b = set.add(FileDescriptor::new("a.x"));

    assert_eq!((a.raw(), b.raw()), (0, 1));
    assert_ne!(a, b);
    assert_eq!(set.len(), 2);
    let kinds: Vec<_> = set.iter().map(|(id, d)| (id, d.kind())).collect();
    assert_eq!(kinds, [(a, "file"), (b, "file")]);
}

#[test]
#[should_panic(expected = "past the end of the set")]
fn add_rejects_reference_past_the_end() {
    let mut other = DescriptorSet::<MdRef>::new();
    other.add(FileDescriptor::new("a.x"));
    let foreign = other.add(BasicTypeDescriptor::new("int", 32, DwarfTypeEncoding::Signed));

    let mut set = DescriptorSet::<MdRef>::new();
    set.add(DerivedTypeDescriptor::pointer(Some(foreign), 64));
}

#[test]
#[should_panic(expected = "out of range for this descriptor set")]
fn get_rejects_out_of_range_id() {
    let mut other = DescriptorSet::<MdRef>::new();
    let foreign = other.add(FileDescriptor::new("a.x"));

    let set = DescriptorSet::<MdRef>::new();
    let _ = set.get(foreign);
}

#[test]
fn try_get_returns_none_for_out_of_range_id() {
    let mut other = DescriptorSet::<MdRef>::new();
    let foreign = other.add(FileDescriptor::new("a.x"));
    assert!(DescriptorSet::<MdRef>::new().try_get(foreign).is_none());
}

#[test]
fn in_range_id_from_another_set_resolves_locally() {
    // Ids are plain indices: the set cannot tell where one came from.
    let mut other = DescriptorSet::<MdRef>::new();
    let foreign = other.add(FileDescriptor::new("a.x"));

    let mut set = DescriptorSet::<MdRef>::new();
    let int = set.add(BasicTypeDescriptor::new("int", 32, DwarfTypeEncoding::Signed));
    let ptr = set.add(DerivedTypeDescriptor::pointer(Some(foreign), 64));

    assert_eq!(foreign, int);
    assert_eq!(set[ptr].references(), [int]);
    assert_eq!(set.get(foreign).kind(), "basic_type");
}

proptest! {
    #[test]
    fn split_recovers_directory_and_filename(
        dir in "(/[a-z]{1,8}){0,4}",
        file in "[a-z._]{1,12}",
    ) {
        let desc = FileDescriptor::new(format!("{dir}/{file}"));
        prop_assert_eq!(desc.split(), (dir.as_str(), file.as_str()));
    }

    #[test]
    fn argument_lives_above_bit_24(line in 0u32..(1 << 24), argument in 0u32..256) {
        let mut set = DescriptorSet::new();
        let mut var = LocalVariableDescriptor::argument("a", argument);
        var.line = line;
        let id = set.add(var);

        let (arena, node) = lowered(&set, id);
        let encoded = arena.field(node, 4).and_then(MdRef::as_int).unwrap();
        prop_assert_eq!(encoded & 0x00ff_ffff, u64::from(line));
        prop_assert_eq!(encoded >> 24, u64::from(argument));
    }
}
