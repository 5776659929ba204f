//! Transformation orchestrator
//!
//! Runs one generation pass: validate the descriptors, resolve every column,
//! partition split tables, declare and render each class, then assemble the
//! import block and class blocks into a single module.

use crate::catalog::TypeCatalog;
use crate::codegen::ClassRenderer;
use crate::constraints::ConstraintSynthesizer;
use crate::imports::ImportRegistry;
use crate::partition::{ExclusionSets, FieldPartitioner};
use crate::{
    ClassDeclaration, ColumnAttribute, Dialect, GenerateError, GeneratorOptions, ModelClass, Result,
    SchemaValidator, TableDescriptor,
};

/// Pydantic model generator
///
/// Holds configuration only; every [`generate`](Generator::generate) call
/// owns its import registry, so a generator can be shared between threads.
pub struct Generator {
    options: GeneratorOptions,
    catalog: TypeCatalog,
    renderer: ClassRenderer,
}

impl Generator {
    /// Create a generator using the built-in type catalog
    pub fn new(options: GeneratorOptions) -> Result<Self> {
        Self::with_catalog(options, TypeCatalog::default())
    }

    /// Create a generator resolving types against `catalog`
    pub fn with_catalog(options: GeneratorOptions, catalog: TypeCatalog) -> Result<Self> {
        let renderer = ClassRenderer::new(options.indentation.clone())?;
        Ok(Self {
            options,
            catalog,
            renderer,
        })
    }

    /// Generate the Python module declaring models for `tables`.
    ///
    /// Any failure aborts the whole run; no partial output is returned.
    pub fn generate(&self, tables: &[TableDescriptor]) -> Result<String> {
        self.validate(tables)?;

        let mut registry = self.new_registry();
        let models = self.build_models(tables, &mut registry)?;
        let declarations = self.declare_all(&models, &mut registry)?;

        let mut sections = Vec::with_capacity(declarations.len() + 1);
        let mut classes = Vec::with_capacity(declarations.len());
        for class in &declarations {
            classes.push(self.renderer.render(class)?);
            log::debug!("Rendered class {} ({} fields)", class.name, class.fields.len());
        }

        if let Some(imports) = registry.render() {
            sections.push(imports);
        }
        sections.extend(classes);

        let mut output = sections.join("\n\n");
        output.push('\n');
        Ok(output)
    }

    /// Resolve and partition `tables` without rendering
    pub fn generate_models<'a>(&self, tables: &'a [TableDescriptor]) -> Result<Vec<ModelClass<'a>>> {
        self.validate(tables)?;
        self.resolve_models(tables)
    }

    /// Like [`generate_models`](Generator::generate_models), for callers that
    /// already ran [`SchemaValidator`] themselves and reported its findings
    pub fn resolve_models<'a>(&self, tables: &'a [TableDescriptor]) -> Result<Vec<ModelClass<'a>>> {
        let mut scratch = self.new_registry();
        let models = self.build_models(tables, &mut scratch)?;
        self.declare_all(&models, &mut scratch)?;
        Ok(models)
    }

    fn new_registry(&self) -> ImportRegistry {
        ImportRegistry::new(self.options.stdlib_modules.iter().cloned())
    }

    fn validate(&self, tables: &[TableDescriptor]) -> Result<()> {
        let result = SchemaValidator::validate_tables(tables, &self.options);
        for warning in &result.warnings {
            log::warn!("{}", warning);
        }
        result.into_result()
    }

    /// Resolve every table into its classes, in render order
    fn build_models<'a>(
        &self,
        tables: &'a [TableDescriptor],
        registry: &mut ImportRegistry,
    ) -> Result<Vec<ModelClass<'a>>> {
        let mut models = Vec::new();

        for table in tables {
            let columns = self.resolve_columns(table, registry)?;
            let class_name = table.model_name();

            if table.is_split(self.options.split_models) {
                let exclusions = ExclusionSets::for_table(&self.options, table);
                exclusions.validate(table, self.options.exclusion_overlap)?;
                log::debug!("Splitting table '{}' into {} variants", table.name, class_name);
                models.extend(FieldPartitioner::new(&exclusions).split(&class_name, &table.name, &columns));
            } else {
                let mut model = ModelClass::new(class_name, table.name.clone());
                model.columns = columns;
                models.push(model);
            }
        }

        Ok(models)
    }

    /// Type Resolver and Constraint Synthesizer over one table's columns
    fn resolve_columns<'a>(
        &self,
        table: &'a TableDescriptor,
        registry: &mut ImportRegistry,
    ) -> Result<Vec<ColumnAttribute<'a>>> {
        let synthesizer = ConstraintSynthesizer::new(&self.options);

        table
            .columns
            .iter()
            .map(|column| {
                let dialect = column.effective_dialect(table);
                let resolved = self.catalog.resolve(&column.type_name, dialect).ok_or_else(|| {
                    GenerateError::UnsupportedColumnType {
                        table: table.name.clone(),
                        column: column.name.clone(),
                        type_name: column.type_name.clone(),
                        dialect: dialect.unwrap_or(Dialect::Generic),
                    }
                })?;
                let semantic_type = synthesizer.type_expression(&resolved, column, registry);
                log::debug!(
                    "Resolved {}.{} ({}) as {}",
                    table.name,
                    column.name,
                    column.type_name,
                    semantic_type
                );
                Ok(ColumnAttribute::new(column, semantic_type))
            })
            .collect()
    }

    /// Declare every model, then make sure no class name rebinds a symbol the
    /// module imports
    fn declare_all(
        &self,
        models: &[ModelClass<'_>],
        registry: &mut ImportRegistry,
    ) -> Result<Vec<ClassDeclaration>> {
        let declarations: Vec<ClassDeclaration> = models
            .iter()
            .map(|model| self.declare(model, registry))
            .collect();

        for class in &declarations {
            if let Some(package) = registry.provider(&class.name) {
                return Err(GenerateError::Validation(format!(
                    "Class '{}' shadows the '{}' imported from '{}'",
                    class.name, class.name, package
                )));
            }
        }
        Ok(declarations)
    }

    /// Field declarations and parent of one class, registering the imports
    /// the declaration itself needs
    fn declare(&self, model: &ModelClass<'_>, registry: &mut ImportRegistry) -> ClassDeclaration {
        let synthesizer = ConstraintSynthesizer::new(&self.options);

        let parent = match &model.parent {
            Some(parent) => parent.clone(),
            None => {
                let base = &self.options.base_model;
                if let Some(module) = &base.module {
                    registry.register(module, &base.name);
                }
                base.name.clone()
            }
        };

        ClassDeclaration {
            name: model.name.clone(),
            parent,
            fields: model
                .columns
                .iter()
                .map(|attr| synthesizer.declare(attr, registry))
                .collect(),
        }
    }
}
